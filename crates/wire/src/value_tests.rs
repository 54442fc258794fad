// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rmpv::Value;
use serde_json::json;

use super::*;

#[test]
fn json_document_survives_conversion() {
    let doc = json!({
        "uptime": 738,
        "identity": "node-1",
        "apps": { "Echo": { "state": "running", "load-median": 0.5, "slaves": [1, -2] } },
        "flag": null,
        "ok": true,
    });

    assert_eq!(value_to_json(&json_to_value(&doc)), doc);
}

#[test]
fn binary_renders_as_text_when_utf8() {
    assert_eq!(value_to_json(&Value::Binary(b"hello".to_vec())), json!("hello"));
    assert_eq!(value_to_json(&Value::Binary(vec![0xff, 0x00])), json!([255, 0]));
}

#[test]
fn non_string_keys_use_display_form() {
    let value = Value::Map(vec![(Value::from(1), Value::from("one"))]);
    assert_eq!(value_to_json(&value), json!({ "1": "one" }));
}

#[test]
fn nan_becomes_null() {
    assert_eq!(value_to_json(&Value::F64(f64::NAN)), json!(null));
}
