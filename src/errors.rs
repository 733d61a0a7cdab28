// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevloopError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("command {name:?} not found (available: {available})")]
    CommandNotFound { name: String, available: String },

    #[error("commandset {name:?} not found (available: {available})")]
    CommandSetNotFound { name: String, available: String },

    #[error("test suite {name:?} not found (available: {available})")]
    TestSuiteNotFound { name: String, available: String },

    #[error("command {command:?} not found in commandset {set:?}")]
    UnknownCommandInSet { command: String, set: String },

    #[error("could not resolve project root: {0}")]
    ProjectRoot(String),

    #[error("failed to watch project tree: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to spawn {step} step of {name:?}: {error}")]
    Spawn {
        name: String,
        step: &'static str,
        error: std::io::Error,
    },

    #[error("failed to install {name:?}: {reason} (output: {output})")]
    InstallFailed {
        name: String,
        reason: String,
        output: String,
    },

    #[error("exited with {0}")]
    Exited(i32),

    #[error("canceled")]
    Canceled,

    /// Message already includes the cause, so it is not chained as a source.
    #[error("{name} failed: {cause}")]
    CommandFailed {
        name: String,
        cause: Box<DevloopError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DevloopError {
    /// True when this error only reports that the shared scope was canceled,
    /// i.e. it is a consequence of some other failure (or Ctrl-C), not a
    /// root cause.
    pub fn is_canceled(&self) -> bool {
        match self {
            DevloopError::Canceled => true,
            DevloopError::CommandFailed { cause, .. } => cause.is_canceled(),
            _ => false,
        }
    }

    /// Attribute an error to the command that produced it.
    pub fn in_command(self, name: impl Into<String>) -> Self {
        DevloopError::CommandFailed {
            name: name.into(),
            cause: Box::new(self),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DevloopError>;
