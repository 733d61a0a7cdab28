#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use devloop::config::{Command, CommandConfig, ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_command(mut self, name: &str, command: CommandConfig) -> Self {
        self.config.commands.insert(name.to_string(), command);
        self
    }

    pub fn with_global_env(mut self, key: &str, value: &str) -> Self {
        self.config.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_command_set(mut self, name: &str, members: &[&str]) -> Self {
        self.config.commandsets.insert(
            name.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single command.
pub struct CommandBuilder {
    name: String,
    config: CommandConfig,
}

impl CommandBuilder {
    pub fn new(name: &str, cmd: &str) -> Self {
        Self {
            name: name.to_string(),
            config: CommandConfig {
                install: String::new(),
                cmd: cmd.to_string(),
                env: BTreeMap::new(),
                watch: Vec::new(),
            },
        }
    }

    pub fn install(mut self, install: &str) -> Self {
        self.config.install = install.to_string();
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.config.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn watch(mut self, prefix: &str) -> Self {
        self.config.watch.push(prefix.to_string());
        self
    }

    pub fn config(self) -> CommandConfig {
        self.config
    }

    pub fn build(self) -> Arc<Command> {
        Arc::new(Command::from_config(self.name, self.config))
    }
}
