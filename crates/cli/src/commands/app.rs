// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application commands

use clap::{Args, Subcommand};
use serde_json::json;

use super::Route;

#[derive(Args, Debug)]
pub struct AppArgs {
    #[command(subcommand)]
    pub command: AppCommand,
}

#[derive(Subcommand, Debug)]
pub enum AppCommand {
    /// Show installed applications
    List,
    /// Show the manifest of an application
    View {
        /// Application name
        #[arg(short, long)]
        name: String,
    },
    /// Upload an application manifest and package
    Upload {
        /// Application name
        #[arg(short, long)]
        name: String,
        /// Path to the manifest JSON file
        #[arg(long)]
        manifest: String,
        /// Path to the application package
        #[arg(long)]
        package: String,
    },
    /// Upload an application directory; it must contain manifest.json
    #[command(name = "upload2")]
    Upload2 {
        /// Application root directory
        path: String,
        /// Application name (default: the directory name)
        name: Option<String>,
    },
    /// Remove an application from storage
    Remove {
        /// Application name
        #[arg(short, long)]
        name: String,
    },
    /// Start an application with a profile
    Start {
        /// Application name
        #[arg(short, long)]
        name: String,
        /// Profile name
        #[arg(short = 'r', long)]
        profile: String,
    },
    /// Stop an application (alias of stop)
    Pause {
        /// Application name
        #[arg(short, long)]
        name: String,
    },
    /// Stop an application
    Stop {
        /// Application name
        #[arg(short, long)]
        name: String,
    },
    /// Pause then start an application
    Restart {
        /// Application name
        #[arg(short, long)]
        name: String,
        /// Profile name (default: the profile it is running with)
        #[arg(short = 'r', long)]
        profile: Option<String>,
    },
    /// Show application state
    Check {
        /// Application name
        #[arg(short, long)]
        name: String,
    },
}

impl AppCommand {
    pub fn route(self) -> Route {
        match self {
            Self::List => Route::storage("app:list", json!({})),
            Self::View { name } => Route::storage("app:view", json!({ "name": name })),
            Self::Upload { name, manifest, package } => Route::storage(
                "app:upload",
                json!({ "name": name, "manifest": manifest, "package": package }),
            ),
            Self::Upload2 { path, name } => {
                Route::storage("app:upload2", json!({ "path": path, "name": name }))
            }
            Self::Remove { name } => Route::storage("app:remove", json!({ "name": name })),
            Self::Start { name, profile } => {
                Route::node("app:start", json!({ "name": name, "profile": profile }))
            }
            Self::Pause { name } => Route::node("app:pause", json!({ "name": name })),
            Self::Stop { name } => Route::node("app:stop", json!({ "name": name })),
            Self::Restart { name, profile } => {
                Route::node("app:restart", json!({ "name": name, "profile": profile }))
            }
            Self::Check { name } => Route::node("app:check", json!({ "name": name })),
        }
    }
}
