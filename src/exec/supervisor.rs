// src/exec/supervisor.rs

//! Per-command lifecycle: install, run, reload on change, stop.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Command;
use crate::console::OutputSink;
use crate::env::{compose_env, ComposedEnv};
use crate::errors::{DevloopError, Result};
use crate::exec::install::run_install;
use crate::exec::session::RunSession;
use crate::types::SupervisorState;
use crate::watch::ReloadSignal;

/// What ended a wait on a running session.
#[derive(Debug)]
pub enum SessionEvent {
    /// The session finished on its own or via the shared scope.
    Ended(Result<()>),
    /// A watched path changed; carries the path.
    Reload(String),
}

/// Wait until the session ends or a reload is requested.
///
/// If both are ready at the same time the exit wins, so a command that has
/// already stopped is reported instead of being reloaded.
pub async fn next_event(session: &mut RunSession, reload: &mut ReloadSignal) -> SessionEvent {
    tokio::select! {
        biased;
        result = session.wait() => SessionEvent::Ended(result),
        Some(path) = reload.recv() => SessionEvent::Reload(path),
    }
}

/// Owns one command for the lifetime of a group run.
///
/// At most one [`RunSession`] exists per supervisor at any time: a reload
/// stops the current session and waits for it to wind down before the next
/// install starts.
///
/// The supervisor returns when:
/// - the install step fails (no retry; the error carries its output),
/// - the process exits on its own, successfully or not (no restart),
/// - the cancellation token fires (returns `DevloopError::Canceled`).
pub struct CommandSupervisor {
    command: Arc<Command>,
    root: PathBuf,
    global_env: Arc<BTreeMap<String, String>>,
    sink: Arc<dyn OutputSink>,
    reload: ReloadSignal,
    state: SupervisorState,
}

impl fmt::Debug for CommandSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSupervisor")
            .field("command", &self.command.name)
            .field("root", &self.root)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CommandSupervisor {
    pub fn new(
        command: Arc<Command>,
        root: impl Into<PathBuf>,
        global_env: Arc<BTreeMap<String, String>>,
        sink: Arc<dyn OutputSink>,
        reload: ReloadSignal,
    ) -> Self {
        Self {
            command,
            root: root.into(),
            global_env,
            sink,
            reload,
            state: SupervisorState::Installing,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Drive the install → run → reload loop until a terminal outcome.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        loop {
            // Shutdown may have landed while the previous session was stopping.
            if cancel.is_cancelled() {
                self.transition(SupervisorState::Exited);
                return Err(DevloopError::Canceled);
            }

            self.transition(SupervisorState::Installing);
            self.status(format!("Installing {}...", self.command.name));

            let env = self.compose_env();

            if let Err(err) = run_install(&self.command, &self.root, &env, &cancel).await {
                self.finish(&err);
                return Err(err);
            }

            // A change that arrived while installing is already part of
            // what was just built.
            if self.reload.clear() {
                debug!(command = %self.command.name, "discarded reload queued during install");
            }

            self.status(format!("Successfully installed {}", self.command.name));

            self.transition(SupervisorState::Running);
            self.status(format!("Running {}...", self.command.name));

            let mut session = match RunSession::start(
                &self.command,
                &self.root,
                &env,
                Arc::clone(&self.sink),
                &cancel,
            ) {
                Ok(session) => session,
                Err(err) => {
                    self.finish(&err);
                    return Err(err);
                }
            };

            let path = match next_event(&mut session, &mut self.reload).await {
                SessionEvent::Ended(result) => {
                    match &result {
                        Ok(()) => self.transition(SupervisorState::Exited),
                        Err(err) => self.finish(err),
                    }
                    return result;
                }
                SessionEvent::Reload(path) => path,
            };

            self.transition(SupervisorState::Reloading);
            self.status(format!("Change detected: {path}"));
            self.status(format!("Reloading {}...", self.command.name));

            session.stop().await;
            debug!(command = %self.command.name, "previous instance stopped");
        }
    }

    fn compose_env(&self) -> ComposedEnv {
        compose_env(&[self.global_env.as_ref(), &self.command.env])
    }

    fn status(&self, line: String) {
        self.sink.write_line(&line);
    }

    fn transition(&mut self, next: SupervisorState) {
        debug!(command = %self.command.name, from = ?self.state, to = ?next, "state transition");
        self.state = next;
        if next.is_terminal() {
            info!(command = %self.command.name, state = ?next, "supervisor finished");
        }
    }

    fn finish(&mut self, err: &DevloopError) {
        let next = match self.state {
            SupervisorState::Installing if !err.is_canceled() => SupervisorState::Failed,
            _ => SupervisorState::Exited,
        };
        self.transition(next);
    }
}
