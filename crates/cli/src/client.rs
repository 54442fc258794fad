// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster client: locator resolution and service invocation.
//!
//! Every request opens a fresh TCP connection, sends one message and
//! collects `chunk` replies for its session until `choke` or `error`.

use std::fmt;
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cocaine_wire::{Message, MessageCodec, ProtocolError, Value};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, trace};

/// Errors surfaced to the command boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unable to resolve service \"{service}\" at {locator}: {reason}")]
    Resolution { service: String, locator: Address, reason: String },

    /// Failure reported by the remote action, passed through verbatim
    #[error("{0}")]
    Action(String),

    #[error("unable to connect to {address}: {source}")]
    Connection {
        address: Address,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("{step} timed out after {:.1}s", .after.as_secs_f64())]
    Timeout { step: &'static str, after: Duration },

    #[error("{0}")]
    InvalidArgs(String),
}

/// Host and port of a cluster endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// What the locator knows about a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub address: Address,
    pub methods: Vec<String>,
}

/// Remote calls the executors need from the cluster.
#[async_trait]
pub trait Cluster: Send + Sync {
    async fn resolve(&self, service: &str) -> Result<ServiceInfo, ClientError>;

    /// Invoke `method` and return one value per reply chunk.
    async fn invoke(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, ClientError>;
}

/// TCP client for a locator and the services it resolves.
pub struct ClusterClient {
    locator: Address,
    timeout: Duration,
    sessions: AtomicU64,
}

impl ClusterClient {
    pub fn new(locator: Address, timeout: Duration) -> Self {
        Self { locator, timeout, sessions: AtomicU64::new(1) }
    }

    async fn within<F: Future>(
        &self,
        step: &'static str,
        fut: F,
    ) -> Result<F::Output, ClientError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| ClientError::Timeout { step, after: self.timeout })
    }

    /// Send one request and collect chunk payloads until `choke`.
    async fn request(
        &self,
        address: &Address,
        kind: &str,
        payload: Vec<Value>,
    ) -> Result<Vec<Vec<Value>>, ClientError> {
        let session = self.sessions.fetch_add(1, Ordering::Relaxed);
        let stream = self
            .within("connect", TcpStream::connect((address.host.as_str(), address.port)))
            .await?
            .map_err(|source| ClientError::Connection { address: address.clone(), source })?;

        let mut framed = Framed::new(stream, MessageCodec);
        trace!(%address, kind, session, "sending request");
        self.within("send", framed.send(Message::new(kind, session, payload))).await??;

        let mut chunks = Vec::new();
        loop {
            let reply = match self.within("reply", framed.next()).await? {
                Some(reply) => reply?,
                None => {
                    let eof = io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed before the reply was complete",
                    );
                    return Err(ProtocolError::from(eof).into());
                }
            };
            if reply.id != session {
                debug!(expected = session, got = reply.id, "ignoring reply for another session");
                continue;
            }
            match reply.kind.as_str() {
                "chunk" => chunks.push(reply.payload),
                "choke" => return Ok(chunks),
                "error" => return Err(ClientError::Action(error_reason(&reply.payload))),
                other => {
                    let reason = format!("unexpected reply type \"{other}\"");
                    return Err(ProtocolError::Shape(reason).into());
                }
            }
        }
    }

    fn resolution(&self, service: &str, reason: String) -> ClientError {
        ClientError::Resolution {
            service: service.to_string(),
            locator: self.locator.clone(),
            reason,
        }
    }
}

#[async_trait]
impl Cluster for ClusterClient {
    async fn resolve(&self, service: &str) -> Result<ServiceInfo, ClientError> {
        let request = self.request(&self.locator, "resolve", vec![Value::from(service)]);
        let chunks = match request.await {
            Ok(chunks) => chunks,
            Err(ClientError::Action(reason)) => return Err(self.resolution(service, reason)),
            Err(ClientError::Connection { source, .. }) => {
                return Err(self.resolution(service, source.to_string()))
            }
            Err(e) => return Err(e),
        };
        let info = chunks.first().map(Vec::as_slice).and_then(parse_service_info).ok_or_else(|| {
            ProtocolError::Shape(format!(
                "locator reply for \"{service}\" is not [host, port, methods]"
            ))
        })?;
        debug!(service, address = %info.address, methods = info.methods.len(), "resolved service");
        Ok(info)
    }

    async fn invoke(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, ClientError> {
        let info = self.resolve(service).await?;
        if !info.methods.iter().any(|m| m == method) {
            return Err(ClientError::Action(format!(
                "service \"{service}\" has no method \"{method}\""
            )));
        }

        let mut payload = Vec::with_capacity(args.len() + 1);
        payload.push(Value::from(method));
        payload.extend(args);
        let chunks = self.request(&info.address, "invoke", payload).await?;
        Ok(chunks.into_iter().map(chunk_value).collect())
    }
}

fn parse_service_info(payload: &[Value]) -> Option<ServiceInfo> {
    match payload {
        [host, port, methods, ..] => {
            let host = host.as_str()?.to_string();
            let port = u16::try_from(port.as_u64()?).ok()?;
            let methods = methods
                .as_array()?
                .iter()
                .map(|m| m.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()?;
            Some(ServiceInfo { address: Address { host, port }, methods })
        }
        _ => None,
    }
}

/// `[code, reason]`; the reason is what the user sees.
fn error_reason(payload: &[Value]) -> String {
    match payload.get(1) {
        Some(reason) => match reason.as_str() {
            Some(text) => text.to_string(),
            None => reason.to_string(),
        },
        None => "remote error without a reason".to_string(),
    }
}

/// A chunk normally carries a single value; anything else is kept as a list.
fn chunk_value(mut payload: Vec<Value>) -> Value {
    if payload.len() == 1 {
        payload.remove(0)
    } else {
        Value::Array(payload)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
