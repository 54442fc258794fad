// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service connection: one pipe, one decoder, one handler.

use std::cell::RefCell;
use std::io;
use std::rc::{Rc, Weak};

use cocaine_wire::{encode, Decoder, Message, Value};
use mio::event::Source;
use mio::{Interest, Registry, Token};
use tracing::{debug, trace};

use crate::error::ConnectionError;
use crate::pipe::{Endpoint, Pipe, TcpPipe};
use crate::reactor::{EventSource, Reactor};
use crate::stream::{ReadableStream, Subscriber, WritableStream};

/// Receives every message decoded from a connection.
///
/// Handlers run inside the connection's read callback; calling back into
/// the same connection from here fails with `ConnectionError::Busy`.
pub trait MessageHandler {
    fn on_message(&mut self, message: Message);

    /// The connection was closed, by the peer, an error, or locally.
    fn on_close(&mut self, _reason: Option<&ConnectionError>) {}
}

/// Handler for write-only services.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl MessageHandler for Discard {
    fn on_message(&mut self, message: Message) {
        trace!(kind = %message.kind, id = message.id, "discarding inbound message");
    }
}

/// Decoder bound to exactly one handler.
struct Dispatch<H> {
    decoder: Decoder,
    handler: H,
}

impl<H: MessageHandler> Subscriber for Dispatch<H> {
    fn on_bytes(&mut self, chunk: &[u8]) -> Result<(), ConnectionError> {
        let handler = &mut self.handler;
        self.decoder.feed_with(chunk, |message| handler.on_message(message))?;
        Ok(())
    }
}

struct Inner<P, H> {
    pipe: P,
    endpoint: Option<Endpoint>,
    token: Option<Token>,
    reader: ReadableStream<Dispatch<H>>,
    writer: WritableStream,
    closed: bool,
}

impl<P: Pipe, H: MessageHandler> Inner<P, H> {
    fn shut(&mut self, reason: Option<&ConnectionError>) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.pipe.shutdown() {
            debug!(error = %e, "pipe shutdown failed");
        }
        self.writer.clear();
        let dispatch = self.reader.subscriber_mut();
        dispatch.decoder.reset();
        dispatch.handler.on_close(reason);
    }
}

/// Handle to a connection with one service endpoint.
///
/// Clones share the same connection. The reactor only holds a weak handle,
/// so dropping the last clone closes the pipe and the registration is
/// reaped on the reactor's next turn.
pub struct ServiceConnection<P, H> {
    inner: Rc<RefCell<Inner<P, H>>>,
}

impl<P, H> Clone for ServiceConnection<P, H> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<H: MessageHandler + 'static> ServiceConnection<TcpPipe, H> {
    /// Connect to `endpoint` over TCP and register with `reactor`.
    pub fn connect(
        endpoint: &Endpoint,
        handler: H,
        reactor: &mut Reactor,
    ) -> Result<Self, ConnectionError> {
        let pipe = TcpPipe::connect(endpoint)?;
        let conn = Self::with_pipe(pipe, handler);
        conn.inner.borrow_mut().endpoint = Some(endpoint.clone());
        conn.attach(reactor)?;
        Ok(conn)
    }
}

impl<P: Pipe + Source + 'static, H: MessageHandler + 'static> ServiceConnection<P, H> {
    /// Register the pipe with `reactor` for readiness callbacks.
    pub fn attach(&self, reactor: &mut Reactor) -> Result<Token, ConnectionError> {
        let token = reactor.register(Registration { inner: Rc::downgrade(&self.inner) })?;
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.token = Some(token);
        }
        Ok(token)
    }
}

impl<P: Pipe, H: MessageHandler> ServiceConnection<P, H> {
    /// Wrap an already established pipe.
    pub fn with_pipe(pipe: P, handler: H) -> Self {
        let dispatch = Dispatch { decoder: Decoder::new(), handler };
        let inner = Inner {
            pipe,
            endpoint: None,
            token: None,
            reader: ReadableStream::new(dispatch),
            writer: WritableStream::new(),
            closed: false,
        };
        Self { inner: Rc::new(RefCell::new(inner)) }
    }

    /// Encode a message and queue it for sending.
    pub fn send(&self, kind: &str, id: u64, payload: &[Value]) -> Result<(), ConnectionError> {
        let bytes = encode(kind, id, payload)?;
        self.write_bytes(bytes)
    }

    /// Queue already encoded bytes behind everything sent before.
    pub fn write_bytes(&self, bytes: Vec<u8>) -> Result<(), ConnectionError> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| ConnectionError::Busy)?;
        if inner.closed {
            return Err(ConnectionError::Closed);
        }
        inner.writer.write(bytes);
        Ok(())
    }

    /// Close the pipe and drop queued and partially decoded data.
    pub fn close(&self) -> Result<(), ConnectionError> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| ConnectionError::Busy)?;
        inner.shut(None);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.try_borrow().map(|inner| inner.closed).unwrap_or(false)
    }

    /// Bytes queued for the pipe but not yet written.
    pub fn pending_bytes(&self) -> usize {
        self.inner.try_borrow().map(|inner| inner.writer.pending()).unwrap_or(0)
    }

    /// Bytes of an incomplete inbound frame held by the decoder.
    pub fn buffered_bytes(&self) -> usize {
        self.inner
            .try_borrow()
            .map(|inner| inner.reader.subscriber().decoder.buffered())
            .unwrap_or(0)
    }

    /// Token assigned by [`attach`](Self::attach).
    pub fn token(&self) -> Option<Token> {
        self.inner.try_borrow().ok().and_then(|inner| inner.token)
    }

    /// Endpoint this connection was opened against, if it was opened over TCP.
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.inner.try_borrow().ok().and_then(|inner| inner.endpoint.clone())
    }
}

impl<P: Pipe, H: MessageHandler> EventSource for ServiceConnection<P, H> {
    fn on_readable(&mut self) -> Result<(), ConnectionError> {
        let mut guard = self.inner.try_borrow_mut().map_err(|_| ConnectionError::Busy)?;
        let inner = &mut *guard;
        if inner.closed {
            return Ok(());
        }
        let n = inner.reader.on_readable(&mut inner.pipe)?;
        trace!(bytes = n, "read from service pipe");
        Ok(())
    }

    fn on_writable(&mut self) -> Result<(), ConnectionError> {
        let mut guard = self.inner.try_borrow_mut().map_err(|_| ConnectionError::Busy)?;
        let inner = &mut *guard;
        if inner.closed {
            return Ok(());
        }
        let n = inner.writer.on_writable(&mut inner.pipe)?;
        trace!(bytes = n, pending = inner.writer.pending(), "flushed to service pipe");
        Ok(())
    }

    fn wants_write(&self) -> bool {
        self.inner
            .try_borrow()
            .map(|inner| !inner.closed && !inner.writer.is_empty())
            .unwrap_or(false)
    }

    fn is_closed(&self) -> bool {
        ServiceConnection::is_closed(self)
    }

    fn on_teardown(&mut self, reason: Option<&ConnectionError>) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.shut(reason);
        }
    }
}

/// Weak handle the reactor holds for an attached connection.
struct Registration<P, H> {
    inner: Weak<RefCell<Inner<P, H>>>,
}

impl<P, H> Registration<P, H> {
    fn upgrade(&self) -> Option<ServiceConnection<P, H>> {
        self.inner.upgrade().map(|inner| ServiceConnection { inner })
    }

    /// Run `op` on the pipe, or return `None` once every owner is gone.
    fn on_pipe(&self, op: impl FnOnce(&mut P) -> io::Result<()>) -> Option<io::Result<()>> {
        let inner = self.inner.upgrade()?;
        let result = match inner.try_borrow_mut() {
            Ok(mut guard) => op(&mut guard.pipe),
            Err(_) => Err(io::Error::other("connection is busy")),
        };
        Some(result)
    }
}

impl<P: Pipe, H: MessageHandler> EventSource for Registration<P, H> {
    fn on_readable(&mut self) -> Result<(), ConnectionError> {
        match self.upgrade() {
            Some(mut conn) => conn.on_readable(),
            None => Ok(()),
        }
    }

    fn on_writable(&mut self) -> Result<(), ConnectionError> {
        match self.upgrade() {
            Some(mut conn) => conn.on_writable(),
            None => Ok(()),
        }
    }

    fn wants_write(&self) -> bool {
        self.upgrade().is_some_and(|conn| conn.wants_write())
    }

    fn is_closed(&self) -> bool {
        match self.upgrade() {
            Some(conn) => conn.is_closed(),
            None => true,
        }
    }

    fn on_teardown(&mut self, reason: Option<&ConnectionError>) {
        if let Some(mut conn) = self.upgrade() {
            conn.on_teardown(reason);
        }
    }
}

impl<P: Pipe + Source, H> Source for Registration<P, H> {
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> io::Result<()> {
        self.on_pipe(|pipe| pipe.register(registry, token, interests))
            .unwrap_or_else(|| Err(dropped()))
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> io::Result<()> {
        self.on_pipe(|pipe| pipe.reregister(registry, token, interests))
            .unwrap_or_else(|| Err(dropped()))
    }

    // A dropped pipe has already closed its descriptor, which removes it from the poll set.
    fn deregister(&mut self, registry: &Registry) -> io::Result<()> {
        self.on_pipe(|pipe| pipe.deregister(registry)).unwrap_or(Ok(()))
    }
}

fn dropped() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "connection dropped")
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
