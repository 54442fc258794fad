// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message type and frame encoding.

use rmpv::Value;
use thiserror::Error;

/// Errors raised while encoding or decoding frames.
///
/// Any decode error is fatal to the connection that produced the bytes.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unexpected frame shape: {0}")]
    Shape(String),

    #[error("incomplete frame exceeds {limit} bytes")]
    FrameTooLarge { limit: usize },

    #[error("failed to encode frame: {0}")]
    Encode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One protocol unit: a type tag, an integer id and an ordered payload.
///
/// `id` is a session number for RPC traffic and a severity for log records.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: String,
    pub id: u64,
    pub payload: Vec<Value>,
}

impl Message {
    pub fn new(kind: impl Into<String>, id: u64, payload: Vec<Value>) -> Self {
        Self { kind: kind.into(), id, payload }
    }

    /// Encode this message as a single frame.
    pub fn pack(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(&self.kind, self.id, &self.payload)
    }

    /// Payload element at `index` as a string, if it is one.
    pub fn str_at(&self, index: usize) -> Option<&str> {
        self.payload.get(index).and_then(Value::as_str)
    }

    /// Validate the `[type, id, [payload...]]` shape of a decoded value.
    pub(crate) fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(ProtocolError::Shape(format!("expected array, got {}", other))),
        };
        let [kind, id, payload]: [Value; 3] = items.try_into().map_err(|items: Vec<Value>| {
            ProtocolError::Shape(format!("expected 3 elements, got {}", items.len()))
        })?;

        let kind = match kind {
            Value::String(s) => s
                .into_str()
                .ok_or_else(|| ProtocolError::Shape("type tag is not valid UTF-8".to_string()))?,
            other => {
                return Err(ProtocolError::Shape(format!("type tag is not a string: {other}")))
            }
        };
        let id = id
            .as_u64()
            .ok_or_else(|| ProtocolError::Shape(format!("id is not an unsigned integer: {}", id)))?;
        let payload = match payload {
            Value::Array(payload) => payload,
            other => {
                return Err(ProtocolError::Shape(format!("payload is not an array: {other}")))
            }
        };

        Ok(Self { kind, id, payload })
    }
}

/// Encode `(kind, id, payload)` into one self-contained frame.
pub fn encode(kind: &str, id: u64, payload: &[Value]) -> Result<Vec<u8>, ProtocolError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::Encode(format!("payload too long: {}", payload.len())))?;

    let mut buf = Vec::with_capacity(16 + kind.len());
    rmp::encode::write_array_len(&mut buf, 3).map_err(encode_err)?;
    rmp::encode::write_str(&mut buf, kind).map_err(encode_err)?;
    rmp::encode::write_uint(&mut buf, id).map_err(encode_err)?;
    rmp::encode::write_array_len(&mut buf, len).map_err(encode_err)?;
    for value in payload {
        rmpv::encode::write_value(&mut buf, value).map_err(encode_err)?;
    }
    Ok(buf)
}

fn encode_err(e: impl std::fmt::Display) -> ProtocolError {
    ProtocolError::Encode(e.to_string())
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
