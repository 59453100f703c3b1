// src/config/mod.rs

//! Configuration loading and validation for harness-watch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and overlay CLI flags (`loader.rs`).
//! - Validate URLs, durations and status lists (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_for_cli, load_from_path};
pub use model::{ConfigFile, HarnessSection, PollSection, RawConfigFile};
pub use validate::validate_config;
