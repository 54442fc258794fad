// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;
use similar_asserts::assert_eq;

use super::render;

#[test]
fn nested_reply_is_indented_four_spaces() {
    let reply = json!({
        "apps": { "Echo": { "state": "running", "slaves": [1, 2] } },
        "uptime": 738,
    });

    let expected = r#"{
    "apps": {
        "Echo": {
            "slaves": [
                1,
                2
            ],
            "state": "running"
        }
    },
    "uptime": 738
}"#;
    assert_eq!(render(&reply, false), expected);
}

#[test]
fn status_message_is_printed_bare() {
    let reply = json!("Application echo has been successfully uploaded");
    assert_eq!(render(&reply, false), "Application echo has been successfully uploaded");
}

#[test]
fn empty_containers_stay_inline() {
    assert_eq!(
        render(&json!({ "apps": {}, "list": [] }), false),
        "{\n    \"apps\": {},\n    \"list\": []\n}"
    );
}

#[test]
fn list_of_names() {
    assert_eq!(render(&json!(["app1", "app2"]), false), "[\n    \"app1\",\n    \"app2\"\n]");
}

#[test]
fn keys_are_colored_when_enabled() {
    let rendered = render(&json!({ "uptime": 1 }), true);
    assert_eq!(rendered, "{\n    \x1b[38;5;74m\"uptime\"\x1b[0m: 1\n}");
}

#[test]
fn keys_with_quotes_are_escaped() {
    assert_eq!(render(&json!({ "a\"b": null }), false), "{\n    \"a\\\"b\": null\n}");
}
