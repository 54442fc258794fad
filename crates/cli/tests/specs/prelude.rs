// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared spec helpers: running the binary and faking a cluster.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use assert_cmd::Command;
use cocaine_wire::Decoder;

pub use cocaine_wire::{Message, Value};

/// `cocaine-tool` with color and ambient log filters cleared.
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("cocaine-tool").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("COLOR").env_remove("RUST_LOG");
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Point the tool at a local locator port.
    pub fn locator(self, port: u16) -> Self {
        let port = port.to_string();
        self.args(&["--host", "127.0.0.1", "--port", &port])
    }

    pub fn passes(mut self) -> Output {
        let output = Output::from(self.cmd.output().unwrap());
        assert_eq!(output.code, Some(0), "expected success\n{output:?}");
        output
    }

    pub fn fails_with(mut self, code: i32) -> Output {
        let output = Output::from(self.cmd.output().unwrap());
        assert_eq!(output.code, Some(code), "expected exit code {code}\n{output:?}");
        output
    }
}

#[derive(Debug)]
pub struct Output {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}\n{}", self.stderr);
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }
}

/// Replies for one request, given the fake's own port.
pub type Handler = fn(&Message, u16) -> Vec<Message>;

/// Locator and services on one local port, served from a background thread.
pub fn fake_cluster(handler: Handler) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            thread::spawn(move || serve(stream, handler, port));
        }
    });
    port
}

fn serve(mut stream: TcpStream, handler: Handler, port: u16) {
    let mut decoder = Decoder::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        let Ok(requests) = decoder.feed(&buf[..n]) else { return };
        for request in requests {
            for reply in handler(&request, port) {
                if stream.write_all(&reply.pack().unwrap()).is_err() {
                    return;
                }
            }
        }
    }
}

/// A port nothing listens on.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Resolve replies advertising `methods` on the fake's own port.
pub fn resolved(request: &Message, port: u16, methods: &[&str]) -> Vec<Message> {
    let methods = methods.iter().map(|m| Value::from(*m)).collect();
    vec![
        Message::new(
            "chunk",
            request.id,
            vec![Value::from("127.0.0.1"), Value::from(port), Value::Array(methods)],
        ),
        Message::new("choke", request.id, vec![]),
    ]
}

/// `chunk` with one value followed by `choke`.
pub fn answer(request: &Message, value: Value) -> Vec<Message> {
    vec![Message::new("chunk", request.id, vec![value]), Message::new("choke", request.id, vec![])]
}
