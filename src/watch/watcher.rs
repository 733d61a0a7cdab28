// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::errors::Result;
use crate::watch::filter::should_ignore;
use crate::watch::path_utils::relative_str;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching and ends the path stream.
pub struct WatcherHandle {
    root: PathBuf,
    _inner: RecommendedWatcher,
}

impl WatcherHandle {
    /// The canonical directory being watched.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Watch `root` recursively and stream changed paths relative to it.
///
/// Paths rejected by [`should_ignore`] and pure access events are never
/// emitted. Registration errors (missing directory, permissions, inotify
/// limits) are returned immediately. The stream ends when the handle is dropped; the forwarding
/// task stops on its own once the receiver is dropped.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
) -> Result<(WatcherHandle, mpsc::UnboundedReceiver<String>)> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let (path_tx, path_rx) = mpsc::unbounded_channel::<String>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // Fails only once the forwarding task is gone.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = %root.display(), "file watcher started");

    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            trace!(?event, "received notify event");

            // Reads (including the install step's own) must not cause reloads.
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }

            for path in event.paths {
                let Some(rel) = relative_str(&async_root, &path) else {
                    debug!(?path, "ignoring event outside of watched root");
                    continue;
                };

                if should_ignore(&rel) {
                    trace!(path = %rel, "ignored path");
                    continue;
                }

                if path_tx.send(rel).is_err() {
                    debug!("path consumer gone; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok((
        WatcherHandle {
            root,
            _inner: watcher,
        },
        path_rx,
    ))
}
