// src/console.rs

//! Line-oriented console output shared by all supervised commands.
//!
//! Command output and status lines go through an [`OutputSink`] instead of
//! `println!` so tests can capture them (see `MemorySink` in the test-utils
//! crate).

use std::io::Write;

/// Destination for pre-formatted output lines.
///
/// Implementations must write each line atomically: lines from different
/// commands may interleave with each other, but never within a line.
pub trait OutputSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Production sink writing to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl OutputSink for Console {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout (e.g. `devloop start | head`) must not take the
        // supervisor down with it.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

/// Format a line of process output for the console.
///
/// Returns `None` for lines that are blank after trimming.
pub fn format_output_line(command: &str, raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        None
    } else {
        Some(format!("[{command}] {text}"))
    }
}
