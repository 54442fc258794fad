// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker process bootstrap: find the application name in startup arguments.
//!
//! The runtime launches workers with flags the worker does not own, so only
//! `--app` is picked out and everything else is ignored.

use std::fmt;

use crate::error::StartupError;

/// Name of the hosted application this worker runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppName(String);

impl AppName {
    pub fn new(name: impl Into<String>) -> Result<Self, StartupError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StartupError::EmptyName);
        }
        Ok(Self(name))
    }

    /// Scan `args` for `--app NAME` or `--app=NAME`.
    pub fn from_args<I, S>(args: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            if arg == "--app" {
                return match args.next() {
                    Some(value) => Self::new(value.as_ref()),
                    None => Err(StartupError::MissingValue),
                };
            }
            if let Some(value) = arg.strip_prefix("--app=") {
                return Self::new(value);
            }
        }
        Err(StartupError::MissingApp)
    }

    /// Read the application name from this process's arguments.
    pub fn from_process_args() -> Result<Self, StartupError> {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log target namespace, `app/<name>`.
    pub fn log_target(&self) -> String {
        format!("app/{}", self.0)
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
