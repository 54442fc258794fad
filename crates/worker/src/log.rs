// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log client for hosted applications.
//!
//! Records are fire-and-forget: no acknowledgement, batching or retry.

use cocaine_wire::Value;

use crate::bootstrap::AppName;
use crate::error::ConnectionError;
use crate::pipe::{Endpoint, Pipe, TcpPipe};
use crate::reactor::Reactor;
use crate::service::{Discard, ServiceConnection};

/// Type tag of a log record.
pub const LOG_MESSAGE: &str = "Message";

/// Record severity. Numbering is what the log collector expects:
/// lower is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    pub fn code(self) -> u64 {
        self as u64
    }
}

/// Where a worker's log records go.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub app: AppName,
    pub endpoint: Endpoint,
}

impl LogConfig {
    /// Config for `app` with the endpoint taken from the environment.
    pub fn new(app: AppName) -> Self {
        Self { app, endpoint: crate::env::log_endpoint() }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }
}

/// Leveled log records for one application.
pub struct Log<P = TcpPipe> {
    conn: ServiceConnection<P, Discard>,
    target: String,
}

impl<P> Clone for Log<P> {
    fn clone(&self) -> Self {
        Self { conn: self.conn.clone(), target: self.target.clone() }
    }
}

impl Log<TcpPipe> {
    /// Connect to the log service and register the connection with `reactor`.
    ///
    /// Records are only flushed while the reactor is turned.
    pub fn connect(config: &LogConfig, reactor: &mut Reactor) -> Result<Self, ConnectionError> {
        let conn = ServiceConnection::connect(&config.endpoint, Discard, reactor)?;
        Ok(Self { conn, target: config.app.log_target() })
    }
}

impl<P: Pipe> Log<P> {
    pub fn with_pipe(pipe: P, app: &AppName) -> Self {
        Self { conn: ServiceConnection::with_pipe(pipe, Discard), target: app.log_target() }
    }

    /// `app/<name>`
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn connection(&self) -> &ServiceConnection<P, Discard> {
        &self.conn
    }

    pub fn log(&self, level: LogLevel, text: &str) -> Result<(), ConnectionError> {
        self.conn.send(
            LOG_MESSAGE,
            level.code(),
            &[Value::from(self.target.as_str()), Value::from(text)],
        )
    }

    pub fn debug(&self, text: &str) -> Result<(), ConnectionError> {
        self.log(LogLevel::Debug, text)
    }

    pub fn info(&self, text: &str) -> Result<(), ConnectionError> {
        self.log(LogLevel::Info, text)
    }

    pub fn warn(&self, text: &str) -> Result<(), ConnectionError> {
        self.log(LogLevel::Warn, text)
    }

    pub fn error(&self, text: &str) -> Result<(), ConnectionError> {
        self.log(LogLevel::Error, text)
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
