// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local files read by upload actions, and the blob format storage keeps.
//!
//! Everything here runs before any network traffic, so a bad path fails
//! the action without touching the cluster.

use std::fs;
use std::path::Path;

use cocaine_wire::{ProtocolError, Value};
use serde_json::Value as Json;

use crate::client::ClientError;

/// Manifest file expected at the root of an application directory.
pub const MANIFEST_FILE: &str = "manifest.json";

fn local_error(path: &Path, err: impl std::fmt::Display) -> ClientError {
    ClientError::InvalidArgs(format!("unable to read {}: {err}", path.display()))
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ClientError> {
    if path.as_os_str().is_empty() {
        return Err(ClientError::InvalidArgs("file path is required".to_string()));
    }
    fs::read(path).map_err(|e| local_error(path, e))
}

/// Read and parse a JSON document.
pub fn read_json(path: &Path) -> Result<Json, ClientError> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ClientError::InvalidArgs(format!("{} is not valid JSON: {e}", path.display()))
    })
}

/// Application name implied by a directory path.
pub fn dir_name(dir: &Path) -> Result<String, ClientError> {
    let canonical = fs::canonicalize(dir).map_err(|e| local_error(dir, e))?;
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ClientError::InvalidArgs(format!("{} has no name", dir.display())))
}

/// Pack every file under `dir` into a map of relative path to contents.
///
/// Paths use `/` separators and entries are sorted by path.
pub fn bundle_dir(dir: &Path) -> Result<Vec<u8>, ClientError> {
    let mut files = Vec::new();
    collect_files(dir, dir, &mut files)?;
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let entries =
        files.into_iter().map(|(path, data)| (Value::from(path), Value::Binary(data))).collect();
    pack(&Value::Map(entries))
}

fn collect_files(
    root: &Path,
    dir: &Path,
    out: &mut Vec<(String, Vec<u8>)>,
) -> Result<(), ClientError> {
    for entry in fs::read_dir(dir).map_err(|e| local_error(dir, e))? {
        let path = entry.map_err(|e| local_error(dir, e))?.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        out.push((name, read_bytes(&path)?));
    }
    Ok(())
}

pub fn pack(value: &Value) -> Result<Vec<u8>, ClientError> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value)
        .map_err(|e| ProtocolError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Decode a stored blob; anything that is not exactly one packed value is
/// returned unchanged.
pub fn unpack(value: Value) -> Value {
    let decoded = match &value {
        Value::Binary(bytes) => {
            let mut cursor = bytes.as_slice();
            match rmpv::decode::read_value(&mut cursor) {
                Ok(inner) if cursor.is_empty() => Some(inner),
                _ => None,
            }
        }
        _ => None,
    };
    decoded.unwrap_or(value)
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
