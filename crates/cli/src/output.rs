// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report rendering for executor replies.

use serde_json::Value as Json;

const INDENT: &str = "    ";

/// Render a reply as indented JSON.
///
/// A bare string reply is a status message and is printed as-is. Object
/// keys get the header color when `color` is set.
pub fn render(reply: &Json, color: bool) -> String {
    if let Json::String(message) = reply {
        return message.clone();
    }
    let mut out = String::new();
    write_value(&mut out, reply, 0, color);
    out
}

fn write_value(out: &mut String, value: &Json, depth: usize, color: bool) {
    match value {
        Json::Array(items) if !items.is_empty() => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_value(out, item, depth + 1, color);
            }
            newline(out, depth);
            out.push(']');
        }
        Json::Object(map) if !map.is_empty() => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                let quoted = Json::from(key.as_str()).to_string();
                if color {
                    out.push_str(&crate::color::key(&quoted));
                } else {
                    out.push_str(&quoted);
                }
                out.push_str(": ");
                write_value(out, item, depth + 1, color);
            }
            newline(out, depth);
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
