// src/interrupt.rs

//! Ctrl-C handling.
//!
//! The first interrupt cancels the shared scope and lets every command wind
//! down. A second one exits immediately, for when teardown is stuck (e.g. a
//! detached grandchild holding a pipe open).

use std::future::Future;
use std::io;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Exit status used when a second interrupt forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// How [`watch_interrupts`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// A second interrupt arrived after shutdown had begun.
    ForceExit,
    /// The signal source failed; no further interrupts will be seen.
    ListenerGone,
}

/// Cancel `cancel` on the first interrupt from `next_interrupt`, then wait
/// for a second one.
pub async fn watch_interrupts<F, Fut>(
    mut next_interrupt: F,
    cancel: CancellationToken,
) -> InterruptOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = next_interrupt().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        return InterruptOutcome::ListenerGone;
    }
    info!("interrupt received; stopping commands (Ctrl+C again to exit immediately)");
    cancel.cancel();

    match next_interrupt().await {
        Ok(()) => {
            warn!("second interrupt; exiting without waiting for commands");
            InterruptOutcome::ForceExit
        }
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            InterruptOutcome::ListenerGone
        }
    }
}

/// Listen for Ctrl-C in the background for the rest of the process.
pub fn spawn_interrupt_handler(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, cancel).await == InterruptOutcome::ForceExit {
            std::process::exit(FORCED_EXIT_CODE);
        }
    })
}
