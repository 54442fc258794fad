// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-threaded readiness loop.
//!
//! Every registered source is polled through one `mio::Poll`. Callbacks run
//! synchronously on the loop thread and must not block. Write interest is
//! armed only while a source has queued bytes.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use mio::event::Source;
use mio::{Events, Interest, Poll, Token};
use tracing::{debug, trace, warn};

use crate::error::ConnectionError;

const EVENTS_CAPACITY: usize = 256;

/// Readiness callbacks a registered source receives from the reactor.
pub trait EventSource {
    fn on_readable(&mut self) -> Result<(), ConnectionError>;

    fn on_writable(&mut self) -> Result<(), ConnectionError>;

    /// Whether the source has bytes waiting for a writable notification.
    fn wants_write(&self) -> bool;

    fn is_closed(&self) -> bool;

    /// Called once when the reactor drops the registration, with the error
    /// that caused it (if any).
    fn on_teardown(&mut self, reason: Option<&ConnectionError>);
}

/// An event source backed by a descriptor the reactor can poll.
pub trait ReactorSource: EventSource + Source {}

impl<T: EventSource + Source> ReactorSource for T {}

struct Entry {
    source: Box<dyn ReactorSource>,
    interest: Interest,
}

pub struct Reactor {
    poll: Poll,
    events: Events,
    sources: HashMap<Token, Entry>,
    next_token: usize,
}

impl Reactor {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(EVENTS_CAPACITY),
            sources: HashMap::new(),
            next_token: 0,
        })
    }

    /// Register a source for readiness callbacks.
    pub fn register<S: ReactorSource + 'static>(&mut self, mut source: S) -> io::Result<Token> {
        let token = Token(self.next_token);
        self.next_token += 1;

        let interest = interest_for(&source);
        source.register(self.poll.registry(), token, interest)?;
        self.sources.insert(token, Entry { source: Box::new(source), interest });

        debug!(token = token.0, "registered event source");
        Ok(token)
    }

    /// Detach a source without tearing it down. Returns false if unknown.
    pub fn deregister(&mut self, token: Token) -> io::Result<bool> {
        match self.sources.remove(&token) {
            Some(mut entry) => {
                entry.source.deregister(self.poll.registry())?;
                debug!(token = token.0, "deregistered event source");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn contains(&self, token: Token) -> bool {
        self.sources.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Run one loop iteration: sync interests, poll, dispatch.
    ///
    /// Returns how many sources received callbacks. A failing source is torn
    /// down; the loop itself only fails if polling fails.
    pub fn turn(&mut self, timeout: Option<Duration>) -> io::Result<usize> {
        self.reap_closed();
        self.sync_interests();

        match self.poll.poll(&mut self.events, timeout) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(0),
            Err(e) => return Err(e),
        }

        let ready: Vec<(Token, bool, bool)> = self
            .events
            .iter()
            .map(|e| {
                (
                    e.token(),
                    e.is_readable() || e.is_read_closed() || e.is_error(),
                    e.is_writable() || e.is_write_closed(),
                )
            })
            .collect();

        let mut dispatched = 0;
        for (token, readable, writable) in ready {
            let Some(entry) = self.sources.get_mut(&token) else {
                continue;
            };
            trace!(token = token.0, readable, writable, "dispatching readiness");

            let mut result = Ok(());
            if readable {
                result = entry.source.on_readable();
            }
            if writable && result.is_ok() {
                result = entry.source.on_writable();
            }
            dispatched += 1;

            if let Err(err) = result {
                self.teardown(token, Some(err));
            }
        }

        self.reap_closed();
        Ok(dispatched)
    }

    /// Turn the loop until `done` returns true or `timeout` elapses.
    ///
    /// Returns whether `done` was satisfied.
    pub fn run_until(
        &mut self,
        timeout: Duration,
        mut done: impl FnMut() -> bool,
    ) -> io::Result<bool> {
        // No deadline when `timeout` reaches past what `Instant` can hold.
        let deadline = Instant::now().checked_add(timeout);
        while !done() {
            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(false);
                    }
                    Some(deadline - now)
                }
                None => None,
            };
            self.turn(wait)?;
        }
        Ok(true)
    }

    fn sync_interests(&mut self) {
        let registry = self.poll.registry();
        let mut failed = Vec::new();
        for (token, entry) in self.sources.iter_mut() {
            let wanted = interest_for(entry.source.as_ref());
            if wanted == entry.interest {
                continue;
            }
            match entry.source.reregister(registry, *token, wanted) {
                Ok(()) => entry.interest = wanted,
                Err(e) => failed.push((*token, e)),
            }
        }
        for (token, err) in failed {
            self.teardown(token, Some(err.into()));
        }
    }

    fn reap_closed(&mut self) {
        let closed: Vec<Token> = self
            .sources
            .iter()
            .filter(|(_, entry)| entry.source.is_closed())
            .map(|(token, _)| *token)
            .collect();
        for token in closed {
            self.teardown(token, None);
        }
    }

    fn teardown(&mut self, token: Token, reason: Option<ConnectionError>) {
        let Some(mut entry) = self.sources.remove(&token) else {
            return;
        };
        if let Err(e) = entry.source.deregister(self.poll.registry()) {
            debug!(token = token.0, error = %e, "deregister during teardown failed");
        }
        match &reason {
            Some(ConnectionError::Closed) => debug!(token = token.0, "peer closed event source"),
            Some(err) => warn!(token = token.0, error = %err, "event source failed, tearing down"),
            None => debug!(token = token.0, "event source closed"),
        }
        entry.source.on_teardown(reason.as_ref());
    }
}

impl Drop for Reactor {
    fn drop(&mut self) {
        let tokens: Vec<Token> = self.sources.keys().copied().collect();
        for token in tokens {
            self.teardown(token, None);
        }
    }
}

fn interest_for(source: &dyn ReactorSource) -> Interest {
    if source.wants_write() {
        Interest::READABLE | Interest::WRITABLE
    } else {
        Interest::READABLE
    }
}

#[cfg(test)]
#[path = "reactor_tests.rs"]
mod tests;
