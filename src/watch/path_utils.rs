// src/watch/path_utils.rs

//! Turning absolute event paths into watch-prefix form.

use std::path::Path;

/// `path` relative to `root`, as a `/`-separated string.
///
/// Events usually arrive under the exact root we registered, so a plain
/// prefix strip is tried first. When that fails (symlinked temp dirs,
/// `/var` vs `/private/var` on macOS) both sides are canonicalized and the
/// strip is retried; that only works while `path` still exists.
///
/// `None` for paths outside `root` and for `root` itself.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return to_prefix_form(rel);
    }

    let root = root.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    path.strip_prefix(&root).ok().and_then(to_prefix_form)
}

fn to_prefix_form(rel: &Path) -> Option<String> {
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    (!joined.is_empty()).then_some(joined)
}
