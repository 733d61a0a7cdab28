// src/exec/session.rs

//! A single live instance of a command's run step.

use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Command;
use crate::console::OutputSink;
use crate::env::ComposedEnv;
use crate::errors::{DevloopError, Result};
use crate::exec::output::spawn_line_forwarder;
use crate::exec::shell::{kill_process_group, shell_command, terminate};
use crate::types::OutputStream;

/// Handle to a running `cmd` process and the task draining its output.
///
/// The session ends when the process exits on its own or its token is
/// canceled. Either way the session's task only finishes after the process
/// has been reaped and both pipes have been read to EOF, so awaiting it is
/// enough to know that nothing of this instance is left running.
#[derive(Debug)]
pub struct RunSession {
    cancel: CancellationToken,
    handle: JoinHandle<Result<()>>,
}

impl RunSession {
    /// Spawn `command.cmd`.
    ///
    /// The session's token is a child of `parent`, so canceling the shared
    /// scope also stops this session.
    pub fn start(
        command: &Command,
        root: &Path,
        env: &ComposedEnv,
        sink: Arc<dyn OutputSink>,
        parent: &CancellationToken,
    ) -> Result<Self> {
        let mut child = shell_command(&command.cmd, root, env)
            .spawn()
            .map_err(|error| DevloopError::Spawn {
                name: command.name.clone(),
                step: "run",
                error,
            })?;

        let pid = child.id();
        info!(command = %command.name, pid, cmd = %command.cmd, "started process");

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_line_forwarder(
                command.name.clone(),
                OutputStream::Stdout,
                stdout,
                Arc::clone(&sink),
            ));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_line_forwarder(
                command.name.clone(),
                OutputStream::Stderr,
                stderr,
                Arc::clone(&sink),
            ));
        }

        let cancel = parent.child_token();
        let token = cancel.clone();
        let name = command.name.clone();

        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if status.success() => {
                        info!(command = %name, "process exited successfully");
                        Ok(())
                    }
                    Ok(status) => {
                        let code = status.code().unwrap_or(-1);
                        info!(command = %name, exit_code = code, "process exited with failure");
                        Err(DevloopError::Exited(code))
                    }
                    Err(err) => Err(DevloopError::from(err)),
                },
                _ = token.cancelled() => {
                    debug!(command = %name, "session canceled; killing process");
                    terminate(&mut child, &name).await;
                    Err(DevloopError::Canceled)
                }
            };

            // Descendants may still hold the pipes open after the leader exits.
            if let Some(pid) = pid {
                kill_process_group(pid, &name);
            }

            for reader in readers {
                let _ = reader.await;
            }

            result
        });

        Ok(Self { cancel, handle })
    }

    /// Wait for the session to end on its own (or via the parent scope).
    ///
    /// Must not be polled again once it has returned.
    pub async fn wait(&mut self) -> Result<()> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(join_err) => Err(anyhow!("run session task failed: {join_err}").into()),
        }
    }

    /// Cancel the session and wait until it has fully wound down.
    pub async fn stop(self) {
        self.cancel.cancel();
        match self.handle.await {
            Ok(Ok(())) | Ok(Err(DevloopError::Canceled)) => {}
            Ok(Err(err)) => debug!(error = %err, "session ended with error while stopping"),
            Err(join_err) => debug!(error = %join_err, "session task failed while stopping"),
        }
    }
}
