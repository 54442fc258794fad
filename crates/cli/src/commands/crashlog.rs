// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crashlog commands

use clap::{Args, Subcommand};
use serde_json::json;

use super::Route;

#[derive(Args, Debug)]
pub struct CrashlogArgs {
    #[command(subcommand)]
    pub command: CrashlogCommand,
}

#[derive(Subcommand, Debug)]
pub enum CrashlogCommand {
    /// Show crashlogs of an application
    List {
        /// Application name
        #[arg(short, long)]
        name: String,
    },
    /// Show the crashlog with a timestamp
    View {
        /// Application name
        #[arg(short, long)]
        name: String,
        /// Crashlog timestamp
        #[arg(short, long)]
        timestamp: String,
    },
    /// Remove the crashlog with a timestamp
    Remove {
        /// Application name
        #[arg(short, long)]
        name: String,
        /// Crashlog timestamp
        #[arg(short, long)]
        timestamp: String,
    },
    /// Remove all crashlogs of an application
    Removeall {
        /// Application name
        #[arg(short, long)]
        name: String,
    },
}

impl CrashlogCommand {
    pub fn route(self) -> Route {
        match self {
            Self::List { name } => Route::storage("crashlog:list", json!({ "name": name })),
            Self::View { name, timestamp } => {
                Route::storage("crashlog:view", json!({ "name": name, "manifest": timestamp }))
            }
            Self::Remove { name, timestamp } => {
                Route::storage("crashlog:remove", json!({ "name": name, "manifest": timestamp }))
            }
            Self::Removeall { name } => {
                Route::storage("crashlog:removeall", json!({ "name": name, "manifest": null }))
            }
        }
    }
}
