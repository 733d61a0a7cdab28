// src/root.rs

//! Project root resolution.
//!
//! Commands run with the project root as their working directory and the
//! watcher observes it recursively, so this has to be decided before
//! anything starts.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{DevloopError, Result};

/// Marker whose presence identifies a project root.
///
/// Matches both a `.git` directory and the `.git` file used by worktrees.
pub const ROOT_MARKER: &str = ".git";

/// Walk `start` and its ancestors and return the first directory containing
/// [`ROOT_MARKER`], canonicalized.
pub fn resolve_project_root(start: &Path) -> Result<PathBuf> {
    let start = start.canonicalize().map_err(|e| {
        DevloopError::ProjectRoot(format!("cannot access {}: {e}", start.display()))
    })?;

    for dir in start.ancestors() {
        if dir.join(ROOT_MARKER).exists() {
            debug!(root = %dir.display(), "resolved project root");
            return Ok(dir.to_path_buf());
        }
    }

    Err(DevloopError::ProjectRoot(format!(
        "{} is not inside a project tree (no {ROOT_MARKER} found)",
        start.display()
    )))
}

/// Use an explicitly given root (e.g. `--root`) without discovery.
pub fn explicit_project_root(dir: &Path) -> Result<PathBuf> {
    let root = dir.canonicalize().map_err(|e| {
        DevloopError::ProjectRoot(format!("cannot access {}: {e}", dir.display()))
    })?;
    if !root.is_dir() {
        return Err(DevloopError::ProjectRoot(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    Ok(root)
}
