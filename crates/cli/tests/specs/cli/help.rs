// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help and usage specs

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn help_lists_command_groups() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("info")
        .stdout_has("call")
        .stdout_has("app")
        .stdout_has("profile")
        .stdout_has("runlist")
        .stdout_has("crashlog");
}

#[test]
fn help_lists_global_options() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("--host")
        .stdout_has("--port")
        .stdout_has("--color")
        .stdout_has("--timeout")
        .stdout_has("--debug");
}

#[test]
fn app_help_shows_subcommands() {
    cli()
        .args(&["app", "--help"])
        .passes()
        .stdout_has("upload2")
        .stdout_has("restart")
        .stdout_has("check");
}

#[test]
fn runlist_help_shows_add_app() {
    cli().args(&["runlist", "--help"]).passes().stdout_has("add-app");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn missing_required_argument_is_usage_error() {
    cli().args(&["app", "view"]).fails_with(2).stderr_has("--name");
}

#[test]
fn invalid_timeout_is_usage_error() {
    cli().args(&["--timeout", "-3", "info"]).fails_with(2);
}
