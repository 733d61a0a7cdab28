// src/exec/test_suite.rs

//! Running a `[tests.<name>]` suite once.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Command;
use crate::console::OutputSink;
use crate::env::compose_env;
use crate::errors::Result;
use crate::exec::install::run_install;
use crate::exec::session::RunSession;

/// Install (if configured) and run `suite` to completion in `root`.
///
/// Output is forwarded like a supervised command's. Nothing is watched and
/// nothing is restarted: a non-zero exit comes back as
/// [`DevloopError::Exited`](crate::errors::DevloopError::Exited) and
/// cancellation as `Canceled`.
pub async fn run_test_suite(
    suite: &Command,
    root: &Path,
    global_env: &BTreeMap<String, String>,
    sink: Arc<dyn OutputSink>,
    cancel: &CancellationToken,
) -> Result<()> {
    let env = compose_env(&[global_env, &suite.env]);

    if suite.has_install() {
        sink.write_line(&format!("Installing {}...", suite.name));
        run_install(suite, root, &env, cancel).await?;
        sink.write_line(&format!("Successfully installed {}", suite.name));
    }

    sink.write_line(&format!("Running {}...", suite.name));
    let mut session = RunSession::start(suite, root, &env, sink, cancel)?;
    let result = session.wait().await;

    info!(suite = %suite.name, ok = result.is_ok(), "test suite finished");
    result
}
