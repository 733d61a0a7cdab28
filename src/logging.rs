// src/logging.rs

//! Diagnostics for `devloop` itself, via `tracing`.
//!
//! Command output and status lines are not logs: they go through the
//! console sink on stdout. Logs go to stderr so the two never mix.
//!
//! The level comes from `--log-level`, else `DEVLOOP_LOG`, else `info`.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is not given.
pub const LOG_ENV_VAR: &str = "DEVLOOP_LOG";

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(level >= Level::DEBUG)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

/// Effective level for a CLI flag and a raw `DEVLOOP_LOG` value.
///
/// Unparseable env values are ignored rather than rejected.
pub fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    if let Some(level) = cli_level {
        return level.into();
    }
    env_value.and_then(parse_level).unwrap_or(Level::INFO)
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn parse_level(raw: &str) -> Option<Level> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("warning") {
        return Some(Level::WARN);
    }
    raw.parse().ok()
}
