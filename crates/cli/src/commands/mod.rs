// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command tree and action routing.
//!
//! Every command maps to exactly one action on one executor; the executor
//! does the remote work.

pub mod app;
pub mod crashlog;
pub mod profile;
pub mod runlist;

use clap::Subcommand;
use serde_json::{json, Value as Json};

use crate::client::ClientError;
use crate::executor::{ActionArgs, Executor};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show information about the cocaine runtime
    Info,
    /// Invoke a service method, or print the service API when no method is given
    Call {
        /// Service name, resolved through the locator
        service: String,
        /// Method to invoke
        method: Option<String>,
        /// Arguments as the body of a JSON list, e.g. '"apps", "Echo"'
        args: Option<String>,
    },
    /// Application commands
    App(app::AppArgs),
    /// Profile commands
    Profile(profile::ProfileArgs),
    /// Runlist commands
    Runlist(runlist::RunlistArgs),
    /// Crashlog commands
    Crashlog(crashlog::CrashlogArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Node,
    Storage,
}

/// One executor call.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub target: Target,
    pub action: &'static str,
    pub args: ActionArgs,
}

impl Route {
    pub fn node(action: &'static str, args: Json) -> Self {
        Self { target: Target::Node, action, args: object(args) }
    }

    pub fn storage(action: &'static str, args: Json) -> Self {
        Self { target: Target::Storage, action, args: object(args) }
    }
}

fn object(args: Json) -> ActionArgs {
    match args {
        Json::Object(map) => map,
        _ => ActionArgs::new(),
    }
}

impl Commands {
    pub fn route(self) -> Route {
        match self {
            Self::Info => Route::node("info", json!({})),
            Self::Call { service, method, args } => {
                let command = format!(
                    "{service}.{}({})",
                    method.unwrap_or_default(),
                    args.unwrap_or_default()
                );
                Route::node("call", json!({ "command": command }))
            }
            Self::App(args) => args.command.route(),
            Self::Profile(args) => args.command.route(),
            Self::Runlist(args) => args.command.route(),
            Self::Crashlog(args) => args.command.route(),
        }
    }
}

/// Hand the route to its executor.
pub async fn execute(
    route: Route,
    node: &dyn Executor,
    storage: &dyn Executor,
) -> Result<Json, ClientError> {
    let executor = match route.target {
        Target::Node => node,
        Target::Storage => storage,
    };
    executor.execute_action(route.action, route.args).await
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
