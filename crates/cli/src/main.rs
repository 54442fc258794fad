// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! cocaine-tool: manage applications, profiles, runlists and crashlogs in a
//! cocaine cluster.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod color;
mod commands;
mod executor;
mod exit_error;
mod locator;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::commands::Commands;
use crate::exit_error::ExitError;
use crate::locator::{DebugMode, Locator, LocatorArgs};

#[derive(Parser, Debug)]
#[command(
    name = "cocaine-tool",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Cocaine cluster management tool",
    styles = color::styles(),
)]
struct Cli {
    #[command(flatten)]
    locator: LocatorArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(debug: DebugMode) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(debug.filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.locator.debug);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                eprintln!("{exit}");
                ExitCode::from(u8::try_from(exit.code).unwrap_or(1))
            }
            None => {
                eprintln!("Error occurred: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let locator = Locator::from_args(&cli.locator);
    let (node, storage) = locator.executors();
    let route = command.route();
    tracing::debug!(
        action = route.action,
        target = ?route.target,
        locator = %locator.address,
        "dispatching"
    );

    let reply = commands::execute(route, &node, &storage).await.map_err(ExitError::from)?;
    println!("{}", output::render(&reply, color::colorize_reports(cli.locator.color)));
    Ok(())
}
