// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::PollOptions;
use crate::errors::{HarnessWatchError, Result};
use crate::types::RemoteStatus;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = HarnessWatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let status_url = required(&raw.harness.status_url, "status_url")?;
        let dashboard_url = required(&raw.harness.dashboard_url, "dashboard_url")?;

        let options = PollOptions {
            wait_between: seconds(raw.poll.wait_between, "wait_between")?,
            retryable_statuses: raw.poll.retry_on_status.clone(),
            pending_statuses: raw.poll.pending_statuses.clone(),
        };
        let timeout = raw
            .poll
            .timeout
            .map(|secs| seconds(secs, "timeout"))
            .transpose()?;
        let request_timeout = seconds(raw.poll.request_timeout, "request_timeout")?;

        Ok(ConfigFile::new_unchecked(
            status_url,
            dashboard_url,
            raw.harness.auth_scheme,
            options,
            timeout,
            request_timeout,
        ))
    }
}

/// Check a raw config without converting it.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_urls(cfg)?;
    validate_durations(cfg)?;
    validate_retry_statuses(cfg)?;
    validate_pending_statuses(cfg)?;
    Ok(())
}

fn validate_urls(cfg: &RawConfigFile) -> Result<()> {
    let status_url = required(&cfg.harness.status_url, "status_url")?;
    let parsed = reqwest::Url::parse(&status_url).map_err(|e| {
        HarnessWatchError::ConfigError(format!("[harness].status_url is not a valid URL: {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HarnessWatchError::ConfigError(format!(
            "[harness].status_url must use http or https (got '{}')",
            parsed.scheme()
        )));
    }

    required(&cfg.harness.dashboard_url, "dashboard_url")?;
    Ok(())
}

fn validate_durations(cfg: &RawConfigFile) -> Result<()> {
    seconds(cfg.poll.wait_between, "wait_between")?;

    if let Some(timeout) = cfg.poll.timeout {
        if seconds(timeout, "timeout")?.is_zero() {
            return Err(HarnessWatchError::ConfigError(
                "[poll].timeout must be > 0 when set".to_string(),
            ));
        }
    }

    if seconds(cfg.poll.request_timeout, "request_timeout")?.is_zero() {
        return Err(HarnessWatchError::ConfigError(
            "[poll].request_timeout must be > 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry_statuses(cfg: &RawConfigFile) -> Result<()> {
    for code in cfg.poll.retry_on_status.iter().copied() {
        if !(100..=599).contains(&code) {
            return Err(HarnessWatchError::ConfigError(format!(
                "[poll].retry_on_status contains invalid HTTP status {code}"
            )));
        }
        if code == 200 {
            return Err(HarnessWatchError::ConfigError(
                "[poll].retry_on_status cannot contain 200".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_pending_statuses(cfg: &RawConfigFile) -> Result<()> {
    for tag in cfg.poll.pending_statuses.iter() {
        let status = RemoteStatus::parse(tag);
        if !matches!(status, RemoteStatus::Unknown(_)) {
            return Err(HarnessWatchError::ConfigError(format!(
                "[poll].pending_statuses cannot redefine built-in status '{status}'"
            )));
        }
    }
    Ok(())
}

fn required(value: &Option<String>, key: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(HarnessWatchError::ConfigError(format!(
            "missing [harness].{key} (set it in the config file or pass --{})",
            key.replace('_', "-")
        ))),
    }
}

fn seconds(value: f64, key: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        HarnessWatchError::ConfigError(format!(
            "[poll].{key} must be a non-negative number of seconds (got {value})"
        ))
    })
}
