// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duplex byte pipes owned by a service connection.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, ToSocketAddrs};
use std::time::Duration;

use mio::event::Source;
use mio::{Interest, Registry, Token};

use crate::error::ConnectionError;

/// Per-address limit on establishing a TCP connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Host and port of a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Non-blocking duplex byte channel.
///
/// Reads and writes return `WouldBlock` instead of stalling; `Ok(0)` from
/// `read` means the peer closed its end.
pub trait Pipe: Read + Write {
    /// Close both directions. Further writes fail.
    fn shutdown(&mut self) -> io::Result<()>;
}

/// TCP pipe to a resolved endpoint, pollable by the reactor.
#[derive(Debug)]
pub struct TcpPipe {
    stream: mio::net::TcpStream,
    endpoint: Endpoint,
}

impl TcpPipe {
    /// Connect to `endpoint` and switch the socket to non-blocking mode.
    pub fn connect(endpoint: &Endpoint) -> Result<Self, ConnectionError> {
        Self::connect_within(endpoint, CONNECT_TIMEOUT)
    }

    /// Like [`connect`](Self::connect), giving up on each resolved address
    /// after `timeout`.
    pub fn connect_within(endpoint: &Endpoint, timeout: Duration) -> Result<Self, ConnectionError> {
        let connect_err = |source| ConnectionError::Connect { endpoint: endpoint.clone(), source };

        let stream = connect_any(endpoint, timeout).map_err(connect_err)?;
        stream.set_nodelay(true)?;
        stream.set_nonblocking(true)?;

        tracing::debug!(%endpoint, "connected service pipe");
        Ok(Self { stream: mio::net::TcpStream::from_std(stream), endpoint: endpoint.clone() })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

/// First address of `endpoint` that accepts within `timeout`.
fn connect_any(endpoint: &Endpoint, timeout: Duration) -> io::Result<std::net::TcpStream> {
    let mut last = None;
    for addr in (endpoint.host.as_str(), endpoint.port).to_socket_addrs()? {
        match std::net::TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!(%addr, error = %e, "connect attempt failed");
                last = Some(e);
            }
        }
    }
    Err(last.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "host resolved to no addresses")
    }))
}

impl Read for TcpPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Pipe for TcpPipe {
    fn shutdown(&mut self) -> io::Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl Source for TcpPipe {
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> io::Result<()> {
        self.stream.register(registry, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> io::Result<()> {
        self.stream.reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> io::Result<()> {
        self.stream.deregister(registry)
    }
}

#[cfg(test)]
#[path = "pipe_tests.rs"]
mod tests;
