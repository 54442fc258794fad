// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locator endpoint and the global options that configure it.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::client::{Address, ClusterClient};
use crate::executor::{NodeExecutor, StorageExecutor};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 10053;

#[derive(Args, Debug, Clone)]
pub struct LocatorArgs {
    /// Locator hostname
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Locator port
    #[arg(short, long, global = true, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Enable colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Timeout for each network step, in seconds
    #[arg(long, global = true, default_value = "1.0", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Enable debug output
    #[arg(long, global = true, value_enum, default_value_t = DebugMode::Disable)]
    pub debug: DebugMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DebugMode {
    #[default]
    Disable,
    /// Debug output from this tool only
    Tools,
    /// Debug output from everything
    All,
}

impl DebugMode {
    /// Tracing filter directives for this mode.
    pub fn filter(self) -> &'static str {
        match self {
            Self::Disable => "warn",
            Self::Tools => "warn,cocaine_tool=debug,cocaine_wire=debug",
            Self::All => "debug",
        }
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("invalid number of seconds: {s}"))?;
    if secs <= 0.0 {
        return Err("timeout must be positive".to_string());
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

/// Where management commands find the cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Locator {
    pub address: Address,
    pub timeout: Duration,
}

impl Locator {
    pub fn new(address: Address, timeout: Duration) -> Self {
        Self { address, timeout }
    }

    pub fn from_args(args: &LocatorArgs) -> Self {
        Self::new(Address::new(args.host.clone(), args.port), args.timeout)
    }

    /// Both executors, sharing one cluster client.
    pub fn executors(&self) -> (NodeExecutor, StorageExecutor) {
        let cluster = Arc::new(ClusterClient::new(self.address.clone(), self.timeout));
        (NodeExecutor::new(Arc::clone(&cluster)), StorageExecutor::new(cluster))
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
