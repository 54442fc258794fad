// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for worker tests.

use std::cell::RefCell;
use std::rc::Rc;

use cocaine_wire::{Decoder, Message};

use crate::error::ConnectionError;
use crate::service::MessageHandler;

/// What a [`Recorder`] has seen.
#[derive(Debug, Default)]
pub struct Recorded {
    pub messages: Vec<Message>,
    /// One entry per `on_close`, holding the error text if there was one
    pub closes: Vec<Option<String>>,
}

/// Handler that records everything into a shared log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub seen: Rc<RefCell<Recorded>>,
}

impl Recorder {
    pub fn messages(&self) -> Vec<Message> {
        self.seen.borrow().messages.clone()
    }

    pub fn closes(&self) -> Vec<Option<String>> {
        self.seen.borrow().closes.clone()
    }
}

impl MessageHandler for Recorder {
    fn on_message(&mut self, message: Message) {
        self.seen.borrow_mut().messages.push(message);
    }

    fn on_close(&mut self, reason: Option<&ConnectionError>) {
        self.seen.borrow_mut().closes.push(reason.map(|e| e.to_string()));
    }
}

/// Decode every complete frame in `bytes`.
pub fn decode_all(bytes: &[u8]) -> Vec<Message> {
    Decoder::new().feed(bytes).unwrap()
}
