// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-side service plumbing: a single-threaded reactor, buffered
//! read/write streams over a duplex pipe, service connections and the
//! log client used by hosted applications.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod bootstrap;
pub mod env;
mod error;
mod log;
mod pipe;
mod reactor;
mod service;
mod stream;

#[cfg(any(test, feature = "test-support"))]
mod memory_pipe;

#[cfg(test)]
mod test_helpers;

pub use bootstrap::AppName;
pub use error::{ConnectionError, StartupError};
pub use log::{Log, LogConfig, LogLevel, LOG_MESSAGE};
pub use pipe::{Endpoint, Pipe, TcpPipe, CONNECT_TIMEOUT};
pub use reactor::{EventSource, Reactor, ReactorSource};
pub use service::{Discard, MessageHandler, ServiceConnection};
pub use stream::{ReadableStream, Subscriber, WritableStream};

#[cfg(any(test, feature = "test-support"))]
pub use memory_pipe::{memory_pipe, MemoryPipe, PeerHandle};
