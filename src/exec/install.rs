// src/exec/install.rs

//! The install step: run to completion, capture everything it prints.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Command;
use crate::env::ComposedEnv;
use crate::errors::{DevloopError, Result};
use crate::exec::output::read_all;
use crate::exec::shell::{shell_command, terminate};

/// Run `command.install` in `root` and wait for it.
///
/// A non-zero exit is reported as [`DevloopError::InstallFailed`] carrying
/// the captured output (stdout followed by stderr). Cancellation kills the
/// step and returns [`DevloopError::Canceled`]. An empty install is a no-op.
pub async fn run_install(
    command: &Command,
    root: &Path,
    env: &ComposedEnv,
    cancel: &CancellationToken,
) -> Result<()> {
    if !command.has_install() {
        debug!(command = %command.name, "no install step configured");
        return Ok(());
    }

    info!(command = %command.name, install = %command.install, "starting install step");

    let mut child = shell_command(&command.install, root, env)
        .spawn()
        .map_err(|error| DevloopError::Spawn {
            name: command.name.clone(),
            step: "install",
            error,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let finished = tokio::select! {
        done = async {
            let (out, err) = tokio::join!(read_all(stdout), read_all(stderr));
            let status = child.wait().await;
            (out, err, status)
        } => Some(done),
        _ = cancel.cancelled() => None,
    };

    let Some((mut out, err, status)) = finished else {
        debug!(command = %command.name, "install step canceled; killing process");
        terminate(&mut child, &command.name).await;
        return Err(DevloopError::Canceled);
    };

    let status = status?;
    out.extend_from_slice(&err);

    if status.success() {
        info!(command = %command.name, "install step finished");
        return Ok(());
    }

    let reason = match status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    };

    Err(DevloopError::InstallFailed {
        name: command.name.clone(),
        reason,
        output: String::from_utf8_lossy(&out).into_owned(),
    })
}
