// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runlist commands

use clap::{Args, Subcommand};
use serde_json::json;

use super::Route;

#[derive(Args, Debug)]
pub struct RunlistArgs {
    #[command(subcommand)]
    pub command: RunlistCommand,
}

#[derive(Subcommand, Debug)]
pub enum RunlistCommand {
    /// Show uploaded runlists
    List,
    /// Show a runlist
    View {
        /// Runlist name
        #[arg(short, long)]
        name: String,
    },
    /// Upload a runlist into storage
    Upload {
        /// Runlist name
        #[arg(short, long)]
        name: String,
        /// Path to the runlist JSON file
        #[arg(long)]
        runlist: String,
    },
    /// Remove a runlist from storage
    Remove {
        /// Runlist name
        #[arg(short, long)]
        name: String,
    },
    /// Add an application with a profile to a runlist
    AddApp {
        /// Runlist name
        #[arg(short, long)]
        name: String,
        /// Application name
        #[arg(long)]
        app: String,
        /// Suggested profile
        #[arg(long)]
        profile: String,
    },
}

impl RunlistCommand {
    pub fn route(self) -> Route {
        match self {
            Self::List => Route::storage("runlist:list", json!({})),
            Self::View { name } => Route::storage("runlist:view", json!({ "name": name })),
            Self::Upload { name, runlist } => {
                Route::storage("runlist:upload", json!({ "name": name, "manifest": runlist }))
            }
            Self::Remove { name } => Route::storage("runlist:remove", json!({ "name": name })),
            Self::AddApp { name, app, profile } => Route::storage(
                "runlist:add-app",
                json!({ "name": name, "app": app, "profile": profile }),
            ),
        }
    }
}
