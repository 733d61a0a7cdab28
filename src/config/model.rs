// src/config/model.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::errors::{DevloopError, Result};
use crate::types::CommandName;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [env]
/// SRC_LOG_LEVEL = "info"
///
/// [commands.api]
/// install = "go build -o .bin/api ./cmd/api"
/// cmd = ".bin/api"
/// watch = ["backend/", "internal/"]
///
/// [commands.api.env]
/// PORT = "3090"
///
/// [commandsets]
/// default = ["api", "web"]
///
/// [tests.backend]
/// cmd = "go test ./backend/..."
/// ```
///
/// All sections are optional at the serde level; [`ConfigFile`] is the
/// validated form the rest of the crate works with.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Global environment from `[env]`, applied to every command before the
    /// command's own `env`.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// All commands from `[commands.<name>]`.
    #[serde(default)]
    pub commands: BTreeMap<CommandName, CommandConfig>,

    /// Named, ordered lists of command names from `[commandsets]`.
    #[serde(default)]
    pub commandsets: BTreeMap<String, Vec<CommandName>>,

    /// Test suites from `[tests.<name>]`. Same shape as a command, but run
    /// once and never watched.
    #[serde(default)]
    pub tests: BTreeMap<String, CommandConfig>,
}

/// `[commands.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CommandConfig {
    /// Shell command that prepares the command (compile, bundle, ...).
    ///
    /// Empty means there is nothing to install.
    #[serde(default)]
    pub install: String,

    /// Shell command that runs the long-lived process.
    pub cmd: String,

    /// Per-command environment, layered over `[env]`.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Path prefixes (relative to the project root) that trigger a reload.
    #[serde(default)]
    pub watch: Vec<String>,
}

/// A fully resolved command. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: CommandName,
    pub install: String,
    pub cmd: String,
    pub env: BTreeMap<String, String>,
    pub watch: Vec<String>,
}

impl Command {
    pub fn from_config(name: impl Into<CommandName>, cfg: CommandConfig) -> Self {
        Self {
            name: name.into(),
            install: cfg.install,
            cmd: cfg.cmd,
            env: cfg.env,
            watch: cfg.watch,
        }
    }

    /// Whether there is an install step to run at all.
    pub fn has_install(&self) -> bool {
        !self.install.trim().is_empty()
    }

    /// Returns true if a change at `rel_path` (relative to the project root)
    /// should reload this command.
    pub fn watches(&self, rel_path: &str) -> bool {
        self.watch
            .iter()
            .any(|prefix| rel_path.starts_with(prefix.as_str()))
    }
}

/// Validated configuration table.
///
/// Built once at startup via `ConfigFile::try_from(RawConfigFile)` and
/// threaded explicitly into everything that needs it.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    env: BTreeMap<String, String>,
    commands: BTreeMap<CommandName, Arc<Command>>,
    commandsets: BTreeMap<String, Vec<CommandName>>,
    tests: BTreeMap<String, Arc<Command>>,
}

impl ConfigFile {
    /// Build without validation; use `TryFrom<RawConfigFile>` instead.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            env: raw.env,
            commands: into_commands(raw.commands),
            commandsets: raw.commandsets,
            tests: into_commands(raw.tests),
        }
    }

    /// Global `[env]` map.
    pub fn global_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn test_suite_names(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    pub fn command_set_names(&self) -> impl Iterator<Item = &str> {
        self.commandsets.keys().map(String::as_str)
    }

    /// Look up a single command by name.
    pub fn command(&self, name: &str) -> Result<Arc<Command>> {
        self.commands
            .get(name)
            .cloned()
            .ok_or_else(|| DevloopError::CommandNotFound {
                name: name.to_string(),
                available: join_names(self.command_names()),
            })
    }

    /// Look up a `[tests.<name>]` suite.
    pub fn test_suite(&self, name: &str) -> Result<Arc<Command>> {
        self.tests
            .get(name)
            .cloned()
            .ok_or_else(|| DevloopError::TestSuiteNotFound {
                name: name.to_string(),
                available: join_names(self.test_suite_names()),
            })
    }

    /// Resolve a command set into its commands, preserving the set's order.
    pub fn command_set(&self, name: &str) -> Result<Vec<Arc<Command>>> {
        let members = self
            .commandsets
            .get(name)
            .ok_or_else(|| DevloopError::CommandSetNotFound {
                name: name.to_string(),
                available: join_names(self.command_set_names()),
            })?;

        members
            .iter()
            .map(|member| {
                self.commands.get(member).cloned().ok_or_else(|| {
                    DevloopError::UnknownCommandInSet {
                        command: member.clone(),
                        set: name.to_string(),
                    }
                })
            })
            .collect()
    }
}

fn into_commands(
    raw: BTreeMap<String, CommandConfig>,
) -> BTreeMap<CommandName, Arc<Command>> {
    raw.into_iter()
        .map(|(name, cfg)| {
            let cmd = Command::from_config(name.clone(), cfg);
            (name, Arc::new(cmd))
        })
        .collect()
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
