// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions served by the `node` service: runtime info and app lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use cocaine_wire::{json_to_value, Value};
use serde_json::Value as Json;
use tracing::debug;

use super::{optional, reply_json, required, unknown_action, ActionArgs, Executor};
use crate::client::{ClientError, Cluster, ClusterClient};

const NODE: &str = "node";

/// Reported by `app:check` for apps the node does not list.
const NOT_RUNNING: &str = "stopped or missing";

pub struct NodeExecutor<C = ClusterClient> {
    cluster: Arc<C>,
}

impl<C: Cluster> NodeExecutor<C> {
    pub fn new(cluster: Arc<C>) -> Self {
        Self { cluster }
    }

    async fn node(&self, method: &str, args: Vec<Value>) -> Result<Json, ClientError> {
        let replies = self.cluster.invoke(NODE, method, args).await?;
        Ok(reply_json(replies))
    }

    async fn info(&self) -> Result<Json, ClientError> {
        self.node("info", vec![]).await
    }

    async fn start(&self, name: &str, profile: &str) -> Result<Json, ClientError> {
        let apps = Value::Map(vec![(Value::from(name), Value::from(profile))]);
        self.node("start_app", vec![apps]).await
    }

    async fn pause(&self, name: &str) -> Result<Json, ClientError> {
        self.node("pause_app", vec![Value::Array(vec![Value::from(name)])]).await
    }

    /// Pause then start, reusing the running profile when none is given.
    async fn restart(&self, name: &str, profile: Option<&str>) -> Result<Json, ClientError> {
        let profile = match profile {
            Some(profile) => profile.to_string(),
            None => {
                let info = self.info().await?;
                running_profile(&info, name).ok_or_else(|| {
                    ClientError::Action(format!(
                        "Application \"{name}\" is not running and profile not specified"
                    ))
                })?
            }
        };
        let paused = self.pause(name).await?;
        let started = self.start(name, &profile).await?;
        Ok(Json::Array(vec![paused, started]))
    }

    async fn check(&self, name: &str) -> Result<Json, ClientError> {
        let info = self.info().await?;
        let state = app_entry(&info, name)
            .and_then(|app| app.get("state"))
            .and_then(Json::as_str)
            .unwrap_or(NOT_RUNNING);

        let mut report = serde_json::Map::new();
        report.insert(name.to_string(), Json::from(state));
        Ok(Json::Object(report))
    }

    /// `SERVICE.METHOD(ARGS)`; without a method, the service API.
    async fn call(&self, command: &str) -> Result<Json, ClientError> {
        let call = parse_call(command)?;
        match call.method {
            None => {
                let info = self.cluster.resolve(call.service).await?;
                Ok(Json::from(info.methods))
            }
            Some(method) => {
                let replies = self.cluster.invoke(call.service, method, call.args).await?;
                Ok(reply_json(replies))
            }
        }
    }
}

#[async_trait]
impl<C: Cluster> Executor for NodeExecutor<C> {
    async fn execute_action(&self, action: &str, args: ActionArgs) -> Result<Json, ClientError> {
        debug!(action, "executing node action");
        match action {
            "info" => self.info().await,
            "call" => self.call(required(&args, "command")?).await,
            "app:start" => self.start(required(&args, "name")?, required(&args, "profile")?).await,
            "app:pause" | "app:stop" => self.pause(required(&args, "name")?).await,
            "app:restart" => {
                self.restart(required(&args, "name")?, optional(&args, "profile")).await
            }
            "app:check" => self.check(required(&args, "name")?).await,
            _ => Err(unknown_action(action)),
        }
    }
}

fn app_entry<'a>(info: &'a Json, name: &str) -> Option<&'a Json> {
    info.get("apps").and_then(|apps| apps.get(name))
}

fn running_profile(info: &Json, name: &str) -> Option<String> {
    app_entry(info, name)
        .and_then(|app| app.get("profile"))
        .and_then(Json::as_str)
        .map(str::to_string)
}

#[derive(Debug, PartialEq)]
struct Call<'a> {
    service: &'a str,
    method: Option<&'a str>,
    args: Vec<Value>,
}

/// Split `SERVICE.METHOD(ARGS)`, reading ARGS as the body of a JSON list.
fn parse_call(command: &str) -> Result<Call<'_>, ClientError> {
    let malformed = || {
        ClientError::InvalidArgs(format!(
            "malformed call \"{command}\", expected SERVICE.METHOD(ARGS)"
        ))
    };
    let (target, rest) = command.split_once('(').ok_or_else(malformed)?;
    let body = rest.strip_suffix(')').ok_or_else(malformed)?;
    let (service, method) = target.split_once('.').unwrap_or((target, ""));
    if service.is_empty() {
        return Err(malformed());
    }

    let args = if body.trim().is_empty() {
        Vec::new()
    } else {
        let parsed: Vec<Json> = serde_json::from_str(&format!("[{body}]")).map_err(|e| {
            ClientError::InvalidArgs(format!("invalid call arguments \"{body}\": {e}"))
        })?;
        parsed.iter().map(json_to_value).collect()
    };

    Ok(Call { service, method: Some(method).filter(|m| !m.is_empty()), args })
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
