// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks the tool command, the report pattern and the log tail size.
///
/// Per-job inputs (archive count, profile hint) are validated when the job
/// starts, after command-line overrides have been applied.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `path` if given; otherwise the default file if it exists; otherwise
/// built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => load_and_validate(path),
        None => {
            let default = default_config_path();
            if default.is_file() {
                load_and_validate(default)
            } else {
                ConfigFile::try_from(RawConfigFile::default())
            }
        }
    }
}

/// `Hindsight.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Hindsight.toml")
}
