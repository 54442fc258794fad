// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io;

use cocaine_wire::ProtocolError;
use thiserror::Error;

use crate::pipe::Endpoint;

/// Failure of a service connection.
///
/// A connection that reported any of these is unusable; callers reconnect
/// explicitly if they want to continue.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection closed")]
    Closed,

    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("connection is busy dispatching a message")]
    Busy,
}

/// Worker process started without the arguments it needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("missing required --app <name> argument")]
    MissingApp,

    #[error("--app requires a value")]
    MissingValue,

    #[error("application name must not be empty")]
    EmptyName,
}
