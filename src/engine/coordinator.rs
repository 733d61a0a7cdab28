// src/engine/coordinator.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Command;
use crate::console::OutputSink;
use crate::errors::{DevloopError, Result};
use crate::exec::CommandSupervisor;
use crate::types::CommandName;
use crate::watch::{spawn_watcher, ChangeMonitor};

/// Runs a group of commands side by side and stops all of them as soon as
/// one of them is done.
///
/// - Every command gets its own [`CommandSupervisor`] and reload signal.
/// - All supervisors share one cancellation scope, a child of the token
///   passed to [`run`](GroupCoordinator::run) (so Ctrl-C reaches them).
/// - The first supervisor to finish, for whatever reason, cancels the scope.
///   The coordinator then waits for every other supervisor to wind down, so
///   no process outlives the call.
/// - The error returned is the first one that was not just a consequence of
///   the scope being canceled, attributed to its command.
pub struct GroupCoordinator {
    commands: Vec<Arc<Command>>,
    root: PathBuf,
    global_env: Arc<BTreeMap<String, String>>,
    sink: Arc<dyn OutputSink>,
}

impl fmt::Debug for GroupCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.commands.iter().map(|c| c.name.as_str()).collect();
        f.debug_struct("GroupCoordinator")
            .field("commands", &names)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GroupCoordinator {
    pub fn new(
        commands: Vec<Arc<Command>>,
        root: impl Into<PathBuf>,
        global_env: BTreeMap<String, String>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            commands,
            root: root.into(),
            global_env: Arc::new(global_env),
            sink,
        }
    }

    /// Watch the project root and supervise every command until the first
    /// one finishes.
    ///
    /// Failing to start the watcher is fatal and happens before any command
    /// is started.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let (watcher, paths) = spawn_watcher(&self.root)?;
        let result = self.run_with_paths(paths, cancel).await;
        drop(watcher);
        result
    }

    /// Like [`run`](GroupCoordinator::run), but reloads are driven by an
    /// arbitrary stream of changed paths (relative to the root) instead of
    /// a filesystem watcher.
    pub async fn run_with_paths(
        self,
        paths: mpsc::UnboundedReceiver<String>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut monitor = ChangeMonitor::new();
        let signals: Vec<_> = self
            .commands
            .iter()
            .map(|command| monitor.register(Arc::clone(command)))
            .collect();

        let monitor_task = tokio::spawn(monitor.run(paths));

        let scope = cancel.child_token();
        // Stop everything if this future is dropped before completion.
        let _scope_guard = scope.clone().drop_guard();
        let mut supervisors = JoinSet::new();
        let mut names: HashMap<tokio::task::Id, CommandName> = HashMap::new();

        for (command, reload) in self.commands.iter().zip(signals) {
            let supervisor = CommandSupervisor::new(
                Arc::clone(command),
                self.root.clone(),
                Arc::clone(&self.global_env),
                Arc::clone(&self.sink),
                reload,
            );
            let token = scope.clone();
            let handle = supervisors.spawn(supervisor.run(token));
            names.insert(handle.id(), command.name.clone());
        }

        info!(commands = self.commands.len(), root = %self.root.display(), "supervising commands");

        let mut first_error: Option<DevloopError> = None;

        while let Some(joined) = supervisors.join_next_with_id().await {
            let (name, outcome) = match joined {
                Ok((id, outcome)) => (names.remove(&id).unwrap_or_default(), outcome),
                Err(join_err) => (
                    names.remove(&join_err.id()).unwrap_or_default(),
                    Err(anyhow!("supervisor task failed: {join_err}").into()),
                ),
            };

            record_outcome(&name, outcome, &mut first_error);

            if !scope.is_cancelled() {
                info!(command = %name, "command finished; stopping the remaining commands");
                scope.cancel();
            }
        }

        monitor_task.abort();

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn record_outcome(name: &str, outcome: Result<()>, first_error: &mut Option<DevloopError>) {
    match outcome {
        Ok(()) => info!(command = %name, "command exited"),
        Err(err) if err.is_canceled() => debug!(command = %name, "command stopped"),
        Err(err) if first_error.is_some() => {
            debug!(command = %name, error = %err, "ignoring failure after shutdown began");
        }
        Err(err) => {
            error!(command = %name, error = %err, "command failed");
            *first_error = Some(err.in_command(name));
        }
    }
}
