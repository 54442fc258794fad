// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Profile commands

use clap::{Args, Subcommand};
use serde_json::json;

use super::Route;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show installed profiles
    List,
    /// Show a profile
    View {
        /// Profile name
        #[arg(short, long)]
        name: String,
    },
    /// Upload a profile into storage
    Upload {
        /// Profile name
        #[arg(short, long)]
        name: String,
        /// Path to the profile JSON file
        #[arg(long)]
        profile: String,
    },
    /// Remove a profile from storage
    Remove {
        /// Profile name
        #[arg(short, long)]
        name: String,
    },
}

impl ProfileCommand {
    pub fn route(self) -> Route {
        match self {
            Self::List => Route::storage("profile:list", json!({})),
            Self::View { name } => Route::storage("profile:view", json!({ "name": name })),
            Self::Upload { name, profile } => {
                Route::storage("profile:upload", json!({ "name": name, "manifest": profile }))
            }
            Self::Remove { name } => Route::storage("profile:remove", json!({ "name": name })),
        }
    }
}
