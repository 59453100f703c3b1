// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
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

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the effective configuration for a CLI invocation.
///
/// - `--config PATH` must point at a readable file.
/// - Without it, [`default_config_path`] is used if present, otherwise the
///   built-in defaults.
/// - CLI flags are overlaid last, then the result is validated.
pub fn load_for_cli(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(path = %path.display(), "using default config file");
                load_from_path(&path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    raw.apply_cli(args);
    ConfigFile::try_from(raw)
}

/// Default config location: `harness-watch.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("harness-watch.toml")
}
