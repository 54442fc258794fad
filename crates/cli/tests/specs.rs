// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specs for the `cocaine-tool` binary.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli"]
mod cli {
    mod cluster;
    mod help;
}
