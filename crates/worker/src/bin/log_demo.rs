// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emit one record per level to the log collector, then exit.
//!
//! Usage: `log-demo --app NAME`

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use cocaine_worker::{AppName, Log, LogConfig, Reactor};
use tracing_subscriber::EnvFilter;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("log-demo: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let app = AppName::from_process_args()?;
    let config = LogConfig::new(app);
    tracing::info!(app = %config.app, endpoint = %config.endpoint, "connecting to log service");

    let mut reactor = Reactor::new()?;
    let log = Log::connect(&config, &mut reactor)?;

    log.info("INFO")?;
    log.debug("DEBUG")?;
    log.error("ERROR")?;
    log.warn("WARN")?;

    let conn = log.connection().clone();
    let flushed =
        reactor.run_until(FLUSH_TIMEOUT, || conn.pending_bytes() == 0 || conn.is_closed())?;
    if conn.is_closed() {
        anyhow::bail!("log service closed the connection before records were flushed");
    }
    if !flushed {
        anyhow::bail!("timed out flushing {} bytes to {}", conn.pending_bytes(), config.endpoint);
    }

    conn.close()?;
    tracing::info!(log_target = log.target(), "records flushed");
    Ok(())
}
