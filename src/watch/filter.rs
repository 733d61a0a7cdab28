// src/watch/filter.rs

//! Paths that never trigger a reload.

use std::sync::LazyLock;

use regex::Regex;

/// Ignore patterns, matched against paths relative to the project root.
///
/// Order matters only for readability: the first match wins and any match
/// means "ignore".
pub const IGNORE_PATTERNS: &[&str] = &[
    // Test files.
    r"_test\.go$",
    // Build output.
    r"^\.bin/",
    // Version control metadata.
    r"^\.git/",
    // Developer tooling (this tool's own configuration tree).
    r"^dev/",
    // Dependencies.
    r"^node_modules/",
];

static IGNORE_SET: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    IGNORE_PATTERNS
        .iter()
        .map(|pat| Regex::new(pat).expect("valid ignore pattern"))
        .collect()
});

/// Returns true if a change at `rel_path` should be dropped entirely.
pub fn should_ignore(rel_path: &str) -> bool {
    IGNORE_SET.iter().any(|re| re.is_match(rel_path))
}
