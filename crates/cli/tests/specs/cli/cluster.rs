// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands against a fake locator and node service.

use crate::prelude::*;

fn node(request: &Message, port: u16) -> Vec<Message> {
    match (request.kind.as_str(), request.str_at(0)) {
        ("resolve", Some("node")) => resolved(request, port, &["start_app", "pause_app", "info"]),
        ("invoke", Some("info")) => answer(
            request,
            Value::Map(vec![
                (Value::from("uptime"), Value::from(738)),
                (Value::from("identity"), Value::from("cloud-1")),
            ]),
        ),
        (_, other) => vec![Message::new(
            "error",
            request.id,
            vec![Value::from(1), Value::from(format!("unexpected request {other:?}"))],
        )],
    }
}

#[test]
fn info_prints_runtime_report() {
    let port = fake_cluster(node);

    cli().locator(port).args(&["info"]).passes().stdout_eq(
        "{\n    \"identity\": \"cloud-1\",\n    \"uptime\": 738\n}\n",
    );
}

#[test]
fn call_without_method_prints_api() {
    let port = fake_cluster(node);

    cli()
        .locator(port)
        .args(&["call", "node"])
        .passes()
        .stdout_has("\"start_app\"")
        .stdout_has("\"pause_app\"");
}

#[test]
fn restart_of_stopped_app_without_profile_fails() {
    let port = fake_cluster(node);

    cli()
        .locator(port)
        .args(&["app", "restart", "--name", "Echo"])
        .fails_with(1)
        .stderr_has("Error occurred: Application \"Echo\" is not running and profile not specified");
}

#[test]
fn unknown_service_is_reported() {
    let port = fake_cluster(|request, _| {
        vec![Message::new(
            "error",
            request.id,
            vec![Value::from(2), Value::from("service 'storage' is not available")],
        )]
    });

    cli()
        .locator(port)
        .args(&["app", "list"])
        .fails_with(1)
        .stderr_has("unable to resolve service \"storage\"")
        .stderr_has("service 'storage' is not available");
}

#[test]
fn unreachable_locator_fails_cleanly() {
    cli()
        .locator(closed_port())
        .args(&["info"])
        .fails_with(1)
        .stderr_has("Error occurred: unable to resolve service \"node\"");
}

#[test]
fn upload_of_missing_file_fails_before_connecting() {
    cli()
        .locator(closed_port())
        .args(&["profile", "upload", "--name", "Default", "--profile", "/nonexistent/p.json"])
        .fails_with(1)
        .stderr_has("Error occurred: unable to read /nonexistent/p.json");
}

#[test]
fn silent_locator_times_out() {
    let port = fake_cluster(|_, _| vec![]);

    cli()
        .locator(port)
        .args(&["--timeout", "0.2", "info"])
        .fails_with(1)
        .stderr_has("timed out");
}
