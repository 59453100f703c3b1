// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::engine::{DEFAULT_RETRYABLE_STATUSES, DEFAULT_WAIT_BETWEEN, PollOptions, WatchRequest};
use crate::types::AuthScheme;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [harness]
/// status_url = "https://app.harness.io/gateway/api/deployments/abc/status"
/// dashboard_url = "https://app.harness.io/#/deployments/abc"
/// auth_scheme = "api-key"
///
/// [poll]
/// wait_between = 5.0
/// timeout = 1800
/// request_timeout = 30
/// retry_on_status = [408, 503]
/// pending_statuses = ["PAUSED"]
/// ```
///
/// All sections are optional and have reasonable defaults. The API key is
/// deliberately not part of the file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub harness: HarnessSection,

    #[serde(default)]
    pub poll: PollSection,
}

/// `[harness]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HarnessSection {
    #[serde(default)]
    pub status_url: Option<String>,

    #[serde(default)]
    pub dashboard_url: Option<String>,

    /// `"api-key"` (default) or `"bearer"`.
    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

/// `[poll]` section. Durations are in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct PollSection {
    #[serde(default = "default_wait_between")]
    pub wait_between: f64,

    /// Overall deadline for the watch; unbounded when absent.
    #[serde(default)]
    pub timeout: Option<f64>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: f64,

    /// HTTP status codes retried instead of failing the watch.
    #[serde(default = "default_retry_on_status")]
    pub retry_on_status: Vec<u16>,

    /// Extra Harness tags treated as "still running".
    #[serde(default)]
    pub pending_statuses: Vec<String>,
}

fn default_wait_between() -> f64 {
    DEFAULT_WAIT_BETWEEN.as_secs_f64()
}

fn default_request_timeout() -> f64 {
    30.0
}

fn default_retry_on_status() -> Vec<u16> {
    DEFAULT_RETRYABLE_STATUSES.to_vec()
}

impl Default for PollSection {
    fn default() -> Self {
        Self {
            wait_between: default_wait_between(),
            timeout: None,
            request_timeout: default_request_timeout(),
            retry_on_status: default_retry_on_status(),
            pending_statuses: Vec::new(),
        }
    }
}

impl RawConfigFile {
    /// Overlay the settings given on the command line.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(url) = &args.status_url {
            self.harness.status_url = Some(url.clone());
        }
        if let Some(url) = &args.dashboard_url {
            self.harness.dashboard_url = Some(url.clone());
        }
        if let Some(scheme) = args.auth_scheme {
            self.harness.auth_scheme = scheme;
        }
        if let Some(secs) = args.wait_between {
            self.poll.wait_between = secs;
        }
        if let Some(secs) = args.timeout {
            self.poll.timeout = Some(secs);
        }
        if let Some(secs) = args.request_timeout {
            self.poll.request_timeout = secs;
        }
    }
}

/// Validated configuration.
///
/// Built through `ConfigFile::try_from(RawConfigFile)`, which runs validation.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub status_url: String,
    pub dashboard_url: String,
    pub auth_scheme: AuthScheme,
    pub options: PollOptions,
    pub timeout: Option<Duration>,
    pub request_timeout: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        status_url: String,
        dashboard_url: String,
        auth_scheme: AuthScheme,
        options: PollOptions,
        timeout: Option<Duration>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            status_url,
            dashboard_url,
            auth_scheme,
            options,
            timeout,
            request_timeout,
        }
    }

    /// Build the request for one watch using `auth_token`.
    pub fn watch_request(&self, auth_token: impl Into<String>) -> WatchRequest {
        WatchRequest {
            status_url: self.status_url.clone(),
            dashboard_url: self.dashboard_url.clone(),
            auth_token: auth_token.into(),
            options: self.options.clone(),
        }
    }
}
