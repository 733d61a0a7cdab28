use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DevloopError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DevloopError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Check the invariants every loaded config must satisfy.
///
/// Membership of command sets is deliberately not checked here; it is
/// reported by `ConfigFile::command_set` for the set actually requested.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_commands(cfg)?;
    validate_commands(cfg)?;
    validate_command_sets(cfg)?;
    validate_test_suites(cfg)?;
    Ok(())
}

fn ensure_has_commands(cfg: &RawConfigFile) -> Result<()> {
    if cfg.commands.is_empty() && cfg.tests.is_empty() {
        return Err(DevloopError::ConfigError(
            "config must contain at least one [commands.<name>] or [tests.<name>] section"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    for (name, command) in cfg.commands.iter() {
        if name.trim().is_empty() {
            return Err(DevloopError::ConfigError(
                "command names must not be empty".to_string(),
            ));
        }
        if command.cmd.trim().is_empty() {
            return Err(DevloopError::ConfigError(format!(
                "command '{}' has an empty `cmd`",
                name
            )));
        }
    }
    Ok(())
}

fn validate_command_sets(cfg: &RawConfigFile) -> Result<()> {
    for (name, members) in cfg.commandsets.iter() {
        if members.is_empty() {
            return Err(DevloopError::ConfigError(format!(
                "commandset '{}' must list at least one command",
                name
            )));
        }
    }
    Ok(())
}

fn validate_test_suites(cfg: &RawConfigFile) -> Result<()> {
    for (name, suite) in cfg.tests.iter() {
        if suite.cmd.trim().is_empty() {
            return Err(DevloopError::ConfigError(format!(
                "test suite '{}' has an empty `cmd`",
                name
            )));
        }
        if !suite.watch.is_empty() {
            return Err(DevloopError::ConfigError(format!(
                "test suite '{}' cannot have `watch` entries; suites run once",
                name
            )));
        }
    }
    Ok(())
}
