// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory duplex pipe for exercising connections without sockets.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::pipe::Pipe;

#[derive(Debug, Default)]
struct Shared {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    peer_closed: bool,
    shut_down: bool,
    read_chunk: Option<usize>,
    write_limit: Option<usize>,
    read_error: Option<io::ErrorKind>,
    write_error: Option<io::ErrorKind>,
}

/// Connection-side end of an in-memory pipe.
#[derive(Debug)]
pub struct MemoryPipe {
    shared: Rc<RefCell<Shared>>,
}

/// Test-side end: feeds inbound bytes and inspects what was written.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    shared: Rc<RefCell<Shared>>,
}

/// Create a connected pipe/peer pair.
pub fn memory_pipe() -> (MemoryPipe, PeerHandle) {
    let shared = Rc::new(RefCell::new(Shared::default()));
    (MemoryPipe { shared: Rc::clone(&shared) }, PeerHandle { shared })
}

impl Read for MemoryPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut shared = self.shared.borrow_mut();
        if let Some(kind) = shared.read_error.take() {
            return Err(kind.into());
        }
        if shared.inbound.is_empty() {
            return if shared.peer_closed { Ok(0) } else { Err(io::ErrorKind::WouldBlock.into()) };
        }
        let n = buf.len().min(shared.inbound.len()).min(shared.read_chunk.unwrap_or(usize::MAX));
        for (slot, byte) in buf.iter_mut().zip(shared.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MemoryPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut shared = self.shared.borrow_mut();
        if shared.shut_down {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        if let Some(kind) = shared.write_error.take() {
            return Err(kind.into());
        }
        let n = buf.len().min(shared.write_limit.unwrap_or(usize::MAX));
        if n == 0 && !buf.is_empty() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        shared.outbound.extend_from_slice(&buf[..n]);
        if let Some(limit) = shared.write_limit.as_mut() {
            *limit -= n;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Pipe for MemoryPipe {
    fn shutdown(&mut self) -> io::Result<()> {
        self.shared.borrow_mut().shut_down = true;
        Ok(())
    }
}

impl PeerHandle {
    /// Queue bytes for the connection to read.
    pub fn send(&self, bytes: &[u8]) {
        self.shared.borrow_mut().inbound.extend(bytes.iter().copied());
    }

    /// Signal end-of-stream once queued bytes are consumed.
    pub fn close(&self) {
        self.shared.borrow_mut().peer_closed = true;
    }

    /// Drain everything the connection has written so far.
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.shared.borrow_mut().outbound)
    }

    /// Deliver at most `n` bytes per read call.
    pub fn set_read_chunk(&self, n: usize) {
        self.shared.borrow_mut().read_chunk = Some(n);
    }

    /// Accept only `n` more bytes before reporting would-block; `None` is unlimited.
    pub fn set_write_budget(&self, n: Option<usize>) {
        self.shared.borrow_mut().write_limit = n;
    }

    pub fn fail_next_read(&self, kind: io::ErrorKind) {
        self.shared.borrow_mut().read_error = Some(kind);
    }

    pub fn fail_next_write(&self, kind: io::ErrorKind) {
        self.shared.borrow_mut().write_error = Some(kind);
    }

    /// Whether the connection shut its end down.
    pub fn is_shut_down(&self) -> bool {
        self.shared.borrow().shut_down
    }
}
