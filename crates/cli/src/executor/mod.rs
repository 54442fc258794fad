// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executors turn an action name plus keyword arguments into remote calls.

mod files;
mod node;
mod storage;

#[cfg(test)]
mod fake;

use async_trait::async_trait;
use cocaine_wire::{value_to_json, Value};
use serde_json::Value as Json;

use crate::client::ClientError;

pub use node::NodeExecutor;
pub use storage::StorageExecutor;

/// Keyword arguments of an action.
pub type ActionArgs = serde_json::Map<String, Json>;

#[async_trait]
pub trait Executor: Send + Sync {
    /// Run `action` and return the reply as a JSON document.
    async fn execute_action(&self, action: &str, args: ActionArgs) -> Result<Json, ClientError>;
}

/// Non-empty string argument, or `InvalidArgs`.
fn required<'a>(args: &'a ActionArgs, key: &str) -> Result<&'a str, ClientError> {
    optional(args, key)
        .ok_or_else(|| ClientError::InvalidArgs(format!("argument \"{key}\" is required")))
}

/// Missing, null and empty arguments all read as absent.
fn optional<'a>(args: &'a ActionArgs, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Json::as_str).filter(|s| !s.is_empty())
}

fn unknown_action(action: &str) -> ClientError {
    ClientError::InvalidArgs(format!("unknown action \"{action}\""))
}

/// One reply value as-is, several as a list.
fn reply_json(mut replies: Vec<Value>) -> Json {
    if replies.len() == 1 {
        value_to_json(&replies.remove(0))
    } else {
        Json::Array(replies.iter().map(value_to_json).collect())
    }
}
