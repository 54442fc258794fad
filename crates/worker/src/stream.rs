// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buffered read and write halves of a service pipe.
//!
//! Both halves are driven by readiness notifications. Readiness is
//! edge-triggered, so each notification drains the pipe until it reports
//! would-block.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use crate::error::ConnectionError;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// The single consumer bound to a readable stream.
pub trait Subscriber {
    fn on_bytes(&mut self, chunk: &[u8]) -> Result<(), ConnectionError>;
}

/// Read half: pulls bytes off the pipe and hands each chunk to its subscriber.
pub struct ReadableStream<S> {
    subscriber: S,
    chunk: Box<[u8]>,
}

impl<S: Subscriber> ReadableStream<S> {
    pub fn new(subscriber: S) -> Self {
        Self { subscriber, chunk: vec![0u8; READ_CHUNK_SIZE].into_boxed_slice() }
    }

    /// Handle a readable notification. Returns the number of bytes read.
    ///
    /// End-of-stream surfaces as `ConnectionError::Closed`; bytes that
    /// arrived before it are still delivered.
    pub fn on_readable<R: Read + ?Sized>(
        &mut self,
        pipe: &mut R,
    ) -> Result<usize, ConnectionError> {
        let mut total = 0;
        loop {
            match pipe.read(&mut self.chunk) {
                Ok(0) => return Err(ConnectionError::Closed),
                Ok(n) => {
                    total += n;
                    self.subscriber.on_bytes(&self.chunk[..n])?;
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(total),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn subscriber(&self) -> &S {
        &self.subscriber
    }

    pub fn subscriber_mut(&mut self) -> &mut S {
        &mut self.subscriber
    }
}

/// Write half: queues encoded chunks and flushes them in order.
#[derive(Debug, Default)]
pub struct WritableStream {
    queue: VecDeque<Vec<u8>>,
    /// Bytes of the front chunk already written
    offset: usize,
    pending: usize,
}

impl WritableStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue bytes for transmission. Never blocks.
    pub fn write(&mut self, bytes: Vec<u8>) {
        if bytes.is_empty() {
            return;
        }
        self.pending += bytes.len();
        self.queue.push_back(bytes);
    }

    /// Handle a writable notification. Returns the number of bytes written.
    pub fn on_writable<W: Write + ?Sized>(
        &mut self,
        pipe: &mut W,
    ) -> Result<usize, ConnectionError> {
        let mut total = 0;
        while let Some(front) = self.queue.front() {
            match pipe.write(&front[self.offset..]) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero).into()),
                Ok(n) => {
                    total += n;
                    self.offset += n;
                    self.pending -= n;
                    if self.offset == front.len() {
                        self.queue.pop_front();
                        self.offset = 0;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if total > 0 {
            pipe.flush()?;
        }
        Ok(total)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Bytes queued but not yet accepted by the pipe.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Discard everything still queued.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.offset = 0;
        self.pending = 0;
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
