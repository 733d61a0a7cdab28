// src/watch/monitor.rs

//! Fan-out of changed paths to the commands watching them.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, trace};

use crate::config::Command;

/// Receiving end of a command's reload signal.
///
/// Holds at most one pending reload; it carries the path that caused it.
#[derive(Debug)]
pub struct ReloadSignal {
    rx: mpsc::Receiver<String>,
}

impl ReloadSignal {
    /// Wait for the next reload. `None` once the monitor is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Take a pending reload without waiting.
    pub fn try_recv(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }

    /// Discard any pending reload. Returns true if one was pending.
    pub fn clear(&mut self) -> bool {
        let mut cleared = false;
        while self.rx.try_recv().is_ok() {
            cleared = true;
        }
        cleared
    }
}

struct Subscription {
    command: Arc<Command>,
    tx: mpsc::Sender<String>,
}

/// Routes each changed path to every subscribed command whose watch
/// prefixes match it.
///
/// Subscriptions are registered before the monitor starts running and are
/// never removed, so [`run`](ChangeMonitor::run) takes the monitor by value.
#[derive(Default)]
pub struct ChangeMonitor {
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for ChangeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .subscriptions
            .iter()
            .map(|s| s.command.name.as_str())
            .collect();
        f.debug_struct("ChangeMonitor")
            .field("subscriptions", &names)
            .finish()
    }
}

impl ChangeMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `command` and return its reload signal.
    pub fn register(&mut self, command: Arc<Command>) -> ReloadSignal {
        let (tx, rx) = mpsc::channel(1);
        self.subscriptions.push(Subscription { command, tx });
        ReloadSignal { rx }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Signal every subscriber watching `path`.
    ///
    /// Never blocks: a subscriber that already has a reload pending keeps
    /// that one and this change is folded into it. Returns how many new
    /// reloads were queued.
    pub fn notify(&self, path: &str) -> usize {
        let mut queued = 0;

        for sub in &self.subscriptions {
            if !sub.command.watches(path) {
                continue;
            }

            match sub.tx.try_send(path.to_string()) {
                Ok(()) => {
                    debug!(command = %sub.command.name, %path, "reload queued");
                    queued += 1;
                }
                Err(TrySendError::Full(_)) => {
                    trace!(command = %sub.command.name, %path, "reload already pending; coalesced");
                }
                Err(TrySendError::Closed(_)) => {
                    trace!(command = %sub.command.name, %path, "supervisor gone; dropping change");
                }
            }
        }

        queued
    }

    /// Consume `paths` until the stream ends.
    pub async fn run(self, mut paths: mpsc::UnboundedReceiver<String>) {
        debug!(subscriptions = self.len(), "change monitor started");
        while let Some(path) = paths.recv().await {
            self.notify(&path);
        }
        debug!("change monitor finished (path stream closed)");
    }
}
