// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame codec for cluster service endpoints.
//!
//! Wire format: one MessagePack value per frame, `[type, id, [payload...]]`,
//! frames written back-to-back with no extra length prefix.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod decoder;
mod message;
mod scan;
mod value;

pub use codec::MessageCodec;
pub use decoder::{decode_frame, Decoder, MAX_FRAME_SIZE};
pub use message::{encode, Message, ProtocolError};
pub use value::{json_to_value, value_to_json};

/// Dynamically typed payload value.
pub use rmpv::Value;
