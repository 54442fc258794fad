// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tokio_util` framing adapter over the same frame format.

use bytes::{Buf, BytesMut};
use tokio_util::codec;

use crate::decoder::decode_frame;
use crate::message::{Message, ProtocolError};

/// Codec for `tokio_util::codec::Framed` transports.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageCodec;

impl codec::Decoder for MessageCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, ProtocolError> {
        match decode_frame(&src[..])? {
            Some((message, used)) => {
                src.advance(used);
                Ok(Some(message))
            }
            None => Ok(None),
        }
    }
}

impl codec::Encoder<Message> for MessageCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        dst.extend_from_slice(&item.pack()?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
