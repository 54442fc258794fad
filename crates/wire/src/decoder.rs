// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming frame decoder.
//!
//! Bytes arrive in chunks that have nothing to do with frame boundaries.
//! Frame boundaries are found by scanning headers, and the scan resumes where
//! it stopped, so a frame split anywhere (including inside a length field) is
//! parsed exactly once, when its last byte lands.

use crate::message::{Message, ProtocolError};
use crate::scan::{FrameScan, Progress};

/// Upper bound on bytes buffered for a single incomplete frame.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Decode at most one frame from the front of `buf`.
///
/// Returns the message and the number of bytes it occupied, or `None` when
/// `buf` holds only part of a frame.
pub fn decode_frame(buf: &[u8]) -> Result<Option<(Message, usize)>, ProtocolError> {
    match FrameScan::default().advance(buf)? {
        Progress::Complete(len) => Ok(Some((parse(&buf[..len])?, len))),
        Progress::Need(need) => {
            check_limit(buf.len(), need, MAX_FRAME_SIZE)?;
            Ok(None)
        }
    }
}

fn check_limit(buffered: usize, need: usize, limit: usize) -> Result<(), ProtocolError> {
    if buffered > limit || need > limit {
        return Err(ProtocolError::FrameTooLarge { limit });
    }
    Ok(())
}

/// Build a message from exactly one complete frame.
fn parse(frame: &[u8]) -> Result<Message, ProtocolError> {
    let mut cursor = frame;
    let value = rmpv::decode::read_value(&mut cursor)
        .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    Message::from_value(value)
}

/// Accumulates bytes and yields every message that becomes complete.
#[derive(Debug)]
pub struct Decoder {
    buf: Vec<u8>,
    limit: usize,
    scan: FrameScan,
    need: usize,
    failed: Option<ProtocolError>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_limit(MAX_FRAME_SIZE)
    }

    /// Decoder that rejects incomplete frames longer than `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self { buf: Vec::new(), limit, scan: FrameScan::default(), need: 0, failed: None }
    }

    /// Append `chunk` and return all messages completed by it, in arrival order.
    ///
    /// Trailing partial bytes are kept for the next call. When the chunk also
    /// holds bytes that fail to decode, the messages before them are returned
    /// and the error is reported by the next call instead.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Message>, ProtocolError> {
        if let Some(err) = self.failed.take() {
            return Err(err);
        }

        let mut messages = Vec::new();
        match self.feed_with(chunk, |message| messages.push(message)) {
            Ok(()) => Ok(messages),
            Err(err) if messages.is_empty() => Err(err),
            Err(err) => {
                self.failed = Some(err);
                Ok(messages)
            }
        }
    }

    /// Append `chunk` and hand each completed message to `deliver` as soon as
    /// it is decoded.
    ///
    /// Messages that precede a decode error are delivered before the error
    /// is returned. On error the buffer is discarded.
    pub fn feed_with(
        &mut self,
        chunk: &[u8],
        mut deliver: impl FnMut(Message),
    ) -> Result<(), ProtocolError> {
        self.buf.extend_from_slice(chunk);

        let mut start = 0;
        let outcome = loop {
            let pending = &self.buf[start..];
            if pending.is_empty() || pending.len() < self.need {
                break Ok(());
            }
            match self.scan.advance(pending) {
                Ok(Progress::Complete(len)) => match parse(&pending[..len]) {
                    Ok(message) => {
                        start += len;
                        self.scan = FrameScan::default();
                        self.need = 0;
                        deliver(message);
                    }
                    Err(e) => break Err(e),
                },
                Ok(Progress::Need(need)) => {
                    self.need = need;
                    break check_limit(pending.len(), need, self.limit);
                }
                Err(e) => break Err(e),
            }
        };

        match outcome {
            Ok(()) => {
                self.buf.drain(..start);
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Bytes held back waiting for the rest of a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Buffered length at which the pending frame is looked at again.
    ///
    /// Zero when no frame is pending. Feeds that leave the buffer short of
    /// this length only append.
    pub fn needed(&self) -> usize {
        self.need
    }

    /// Drop any partially received frame.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.scan = FrameScan::default();
        self.need = 0;
        self.failed = None;
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
