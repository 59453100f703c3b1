// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::AuthScheme;

/// Command-line arguments for `harness-watch`.
///
/// Every watch setting except the API key can also come from the config
/// file; flags given here win.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "harness-watch",
    version,
    about = "Poll a Harness deployment until it succeeds or fails.",
    long_about = None
)]
pub struct CliArgs {
    /// Status endpoint of the deployment execution.
    #[arg(long, value_name = "URL")]
    pub status_url: Option<String>,

    /// Dashboard page of the deployment, quoted in failure messages.
    #[arg(long, value_name = "URL")]
    pub dashboard_url: Option<String>,

    /// Harness API key sent with every status request.
    #[arg(long, env = "HARNESS_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: String,

    /// How the API key is sent: `api-key` (x-api-key header) or `bearer`.
    #[arg(long, value_name = "SCHEME")]
    pub auth_scheme: Option<AuthScheme>,

    /// Seconds to wait between two polls (0 disables the delay).
    #[arg(long, value_name = "SECS")]
    pub wait_between: Option<f64>,

    /// Give up after this many seconds without a terminal status.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<f64>,

    /// Path to the config file (TOML).
    ///
    /// Default: `harness-watch.toml` in the current working directory, if it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HARNESS_WATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and validate settings, print them, but don't poll.
    #[arg(long)]
    pub dry_run: bool,
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
