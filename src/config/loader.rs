// src/config/loader.rs

//! Reading `devloop.toml` from disk.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a config file without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading config");
    load_from_str(&fs::read_to_string(path)?)
}

/// Deserialize config text without validating it.
pub fn load_from_str(contents: &str) -> Result<RawConfigFile> {
    Ok(toml::from_str(contents)?)
}

/// Read, deserialize and validate. This is what the binary uses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}
