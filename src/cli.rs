// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Name of the command set started by `devloop start`.
pub const DEFAULT_COMMAND_SET: &str = "default";

/// Command-line arguments for `devloop`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devloop",
    version,
    about = "Install, run and hot-reload local development commands.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, global = true, value_name = "PATH", default_value = "devloop.toml")]
    pub config: String,

    /// Project root to watch and run commands in.
    ///
    /// If omitted, the nearest ancestor of the current directory that
    /// contains `.git` is used.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVLOOP_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the selected commands, but don't run anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run the given command.
    Run {
        /// Name of a `[commands.<name>]` section.
        name: String,
    },
    /// Run the given command set.
    RunSet {
        /// Name of an entry in `[commandsets]`.
        name: String,
    },
    /// Run the command set named "default".
    Start,
    /// Run the given test suite once.
    Test {
        /// Name of a `[tests.<name>]` section.
        name: String,
    },
}

impl CliCommand {
    /// The command set a subcommand refers to, if any.
    pub fn command_set(&self) -> Option<&str> {
        match self {
            CliCommand::Run { .. } | CliCommand::Test { .. } => None,
            CliCommand::RunSet { name } => Some(name),
            CliCommand::Start => Some(DEFAULT_COMMAND_SET),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
