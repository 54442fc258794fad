// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame boundary scanning.
//!
//! Walks MessagePack markers and length fields without building values, so a
//! partially received frame costs only its headers to inspect. Bodies of
//! strings, binaries and extensions are skipped by length.

use rmp::Marker;

use crate::message::ProtocolError;

/// Outcome of scanning the front of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    /// The frame is complete and occupies this many bytes.
    Complete(usize),
    /// Nothing new can be learned until the buffer holds this many bytes.
    Need(usize),
}

/// Resumable scan over one frame.
///
/// Offsets are relative to the first byte of the frame, so the state stays
/// valid when bytes before the frame are drained from the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameScan {
    pos: usize,
    remaining: u64,
}

impl Default for FrameScan {
    fn default() -> Self {
        Self { pos: 0, remaining: 1 }
    }
}

impl FrameScan {
    /// Continue from the last complete element header.
    pub(crate) fn advance(&mut self, frame: &[u8]) -> Result<Progress, ProtocolError> {
        while self.remaining > 0 {
            match element(frame, self.pos)? {
                Step::Need(n) => return Ok(Progress::Need(n)),
                Step::Value { next, children } => {
                    self.pos = next;
                    self.remaining = (self.remaining - 1).saturating_add(children);
                }
            }
        }
        Ok(Progress::Complete(self.pos))
    }
}

enum Step {
    Need(usize),
    Value { next: usize, children: u64 },
}

enum Layout {
    /// Fixed number of bytes after the marker.
    Fixed(usize),
    /// Length field of `width` bytes, then `extra` bytes, then the body.
    Sized { width: usize, extra: usize },
    /// Container whose element count is inline or in a `width`-byte field.
    Items { width: usize, inline: u64, per: u64 },
}

fn element(buf: &[u8], at: usize) -> Result<Step, ProtocolError> {
    let Some(&byte) = buf.get(at) else {
        return Ok(Step::Need(at.saturating_add(1)));
    };
    let start = at + 1;

    let layout = match Marker::from_u8(byte) {
        Marker::FixPos(_) | Marker::FixNeg(_) | Marker::Null | Marker::True | Marker::False => {
            Layout::Fixed(0)
        }
        Marker::U8 | Marker::I8 => Layout::Fixed(1),
        Marker::U16 | Marker::I16 => Layout::Fixed(2),
        Marker::U32 | Marker::I32 | Marker::F32 => Layout::Fixed(4),
        Marker::U64 | Marker::I64 | Marker::F64 => Layout::Fixed(8),
        Marker::FixStr(len) => Layout::Fixed(usize::from(len)),
        Marker::Str8 | Marker::Bin8 => Layout::Sized { width: 1, extra: 0 },
        Marker::Str16 | Marker::Bin16 => Layout::Sized { width: 2, extra: 0 },
        Marker::Str32 | Marker::Bin32 => Layout::Sized { width: 4, extra: 0 },
        Marker::FixExt1 => Layout::Fixed(2),
        Marker::FixExt2 => Layout::Fixed(3),
        Marker::FixExt4 => Layout::Fixed(5),
        Marker::FixExt8 => Layout::Fixed(9),
        Marker::FixExt16 => Layout::Fixed(17),
        Marker::Ext8 => Layout::Sized { width: 1, extra: 1 },
        Marker::Ext16 => Layout::Sized { width: 2, extra: 1 },
        Marker::Ext32 => Layout::Sized { width: 4, extra: 1 },
        Marker::FixArray(n) => Layout::Items { width: 0, inline: u64::from(n), per: 1 },
        Marker::Array16 => Layout::Items { width: 2, inline: 0, per: 1 },
        Marker::Array32 => Layout::Items { width: 4, inline: 0, per: 1 },
        Marker::FixMap(n) => Layout::Items { width: 0, inline: u64::from(n), per: 2 },
        Marker::Map16 => Layout::Items { width: 2, inline: 0, per: 2 },
        Marker::Map32 => Layout::Items { width: 4, inline: 0, per: 2 },
        Marker::Reserved => {
            return Err(ProtocolError::Malformed(format!("reserved marker {byte:#04x}")));
        }
    };

    let step = match layout {
        Layout::Fixed(len) => span(buf, start.saturating_add(len), 0),
        Layout::Sized { width, extra } => match read_len(buf, start, width) {
            Some(len) => {
                let body = usize::try_from(len).unwrap_or(usize::MAX);
                span(buf, start.saturating_add(width + extra).saturating_add(body), 0)
            }
            None => Step::Need(start + width),
        },
        Layout::Items { width: 0, inline, per } => span(buf, start, inline.saturating_mul(per)),
        Layout::Items { width, per, .. } => match read_len(buf, start, width) {
            Some(count) => span(buf, start + width, count.saturating_mul(per)),
            None => Step::Need(start + width),
        },
    };
    Ok(step)
}

fn span(buf: &[u8], next: usize, children: u64) -> Step {
    if buf.len() < next {
        Step::Need(next)
    } else {
        Step::Value { next, children }
    }
}

/// Big-endian length field of `width` bytes at `at`, if fully present.
fn read_len(buf: &[u8], at: usize, width: usize) -> Option<u64> {
    let bytes = buf.get(at..at.checked_add(width)?)?;
    Some(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
