// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the worker crate.

use crate::pipe::Endpoint;

pub const DEFAULT_LOG_HOST: &str = "localhost";
pub const DEFAULT_LOG_PORT: u16 = 12501;

/// Log collector endpoint: `COCAINE_LOG_HOST`/`COCAINE_LOG_PORT` > localhost:12501
pub fn log_endpoint() -> Endpoint {
    let host = std::env::var("COCAINE_LOG_HOST")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_HOST.to_string());
    let port = std::env::var("COCAINE_LOG_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_LOG_PORT);
    Endpoint::new(host, port)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
