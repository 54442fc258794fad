// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rmpv::Value;
use yare::parameterized;

use super::*;

fn packed(value: &Value) -> Vec<u8> {
    let mut bytes = Vec::new();
    rmpv::encode::write_value(&mut bytes, value).unwrap();
    bytes
}

#[parameterized(
    nil = { Value::Nil },
    negative = { Value::from(-7) },
    u64_max = { Value::from(u64::MAX) },
    float = { Value::from(1.5f64) },
    fixstr = { Value::from("echo") },
    str16 = { Value::from("x".repeat(300)) },
    bin32 = { Value::Binary(vec![1; 70_000]) },
    ext = { Value::Ext(3, vec![1, 2, 3]) },
    nested = { Value::Array(vec![Value::from("a"), Value::Array(vec![Value::from(1)])]) },
    map16 = { Value::Map((0..20).map(|i| (Value::from(i), Value::Nil)).collect()) },
)]
fn complete_value_spans_its_encoding(value: Value) {
    let mut bytes = packed(&value);
    let len = bytes.len();
    bytes.extend_from_slice(&[0xc0, 0xc0]);

    assert_eq!(FrameScan::default().advance(&bytes).unwrap(), Progress::Complete(len));
}

#[test]
fn every_prefix_is_incomplete() {
    let value = Value::Array(vec![
        Value::from("Message"),
        Value::from(3),
        Value::Array(vec![Value::from("app/echo"), Value::Binary(vec![9; 600])]),
    ]);
    let bytes = packed(&value);

    for cut in 0..bytes.len() {
        match FrameScan::default().advance(&bytes[..cut]).unwrap() {
            Progress::Need(need) => assert!(need > cut && need <= bytes.len(), "cut {cut}"),
            other => panic!("cut {cut}: {other:?}"),
        }
    }
}

#[test]
fn body_length_is_known_from_header() {
    let bytes = packed(&Value::Binary(vec![0; 1000]));
    // bin16: marker, two length bytes, body
    assert_eq!(FrameScan::default().advance(&bytes[..3]).unwrap(), Progress::Need(1003));
}

#[test]
fn scan_resumes_after_more_bytes() {
    let bytes = packed(&Value::Array(vec![Value::from("a"), Value::from("b".repeat(50))]));
    let mut scan = FrameScan::default();

    assert!(matches!(scan.advance(&bytes[..4]).unwrap(), Progress::Need(_)));
    assert_eq!(scan.advance(&bytes).unwrap(), Progress::Complete(bytes.len()));
}

#[test]
fn reserved_marker_is_malformed() {
    let err = FrameScan::default().advance(&[0x91, 0xc1]).unwrap_err();
    assert!(matches!(err, ProtocolError::Malformed(_)));
}
