// src/engine/mod.rs

//! Poll/retry engine for a single deployment watch.
//!
//! This module ties together:
//! - the response classifier ([`classify`]), a pure function from one fetch
//!   result to a [`PollOutcome`]
//! - the core state machine ([`core`]), which turns outcomes into notifier
//!   commands and a continue/resolve/reject decision
//! - the async shell ([`runtime`]), which performs the requests, sleeps
//!   between polls and honours cancellation
//!
//! The core never touches Tokio, the network or stdout, so its semantics are
//! tested without any of them.

use std::time::Duration;

use thiserror::Error;

use crate::types::RemoteStatus;

pub mod classify;
pub mod core;
pub mod runtime;

pub use self::core::{CoreCommand, CoreStep, Decision, WatchCore};
pub use classify::classify;
pub use runtime::Watcher;

/// Message returned when the deployment reaches `SUCCESS`.
pub const SUCCESS_MESSAGE: &str = "🎉 Deployment succeeded";

/// Default delay between two polls.
pub const DEFAULT_WAIT_BETWEEN: Duration = Duration::from_secs(10);

/// HTTP status codes retried by default.
pub const DEFAULT_RETRYABLE_STATUSES: &[u16] = &[408];

/// Tunables for one watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between consecutive polls, and between a transient error and
    /// its retry. Zero means no delay.
    pub wait_between: Duration,
    /// HTTP status codes treated as transient.
    pub retryable_statuses: Vec<u16>,
    /// Extra remote tags treated like `RUNNING`.
    pub pending_statuses: Vec<String>,
}

impl PollOptions {
    /// Options with the given delay and default everything else.
    ///
    /// Fails for negative, NaN or infinite values.
    pub fn from_secs_f64(wait_between: f64) -> Result<Self, String> {
        let wait_between = Duration::try_from_secs_f64(wait_between)
            .map_err(|e| format!("wait_between must be a non-negative number of seconds ({e})"))?;
        Ok(Self {
            wait_between,
            ..Self::default()
        })
    }

    pub fn is_retryable_status(&self, status_code: u16) -> bool {
        self.retryable_statuses.contains(&status_code)
    }

    pub fn is_pending_tag(&self, tag: &str) -> bool {
        self.pending_statuses.iter().any(|s| s == tag)
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            wait_between: DEFAULT_WAIT_BETWEEN,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.to_vec(),
            pending_statuses: Vec::new(),
        }
    }
}

/// Everything needed to watch one deployment. Immutable during the watch.
#[derive(Clone, PartialEq, Eq)]
pub struct WatchRequest {
    pub status_url: String,
    pub dashboard_url: String,
    pub auth_token: String,
    pub options: PollOptions,
}

// Hand-written so the token never lands in logs.
impl std::fmt::Debug for WatchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchRequest")
            .field("status_url", &self.status_url)
            .field("dashboard_url", &self.dashboard_url)
            .field("auth_token", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

/// Result of classifying one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job is still in progress; poll again.
    Continue(RemoteStatus),
    /// The job reached `SUCCESS`.
    Succeed,
    /// Terminal failure.
    Fail(FailureKind),
    /// Transient transport/HTTP problem; retry after the usual delay.
    RetryableError(String),
}

/// Why a watch ended without success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A non-200 status outside the retryable set.
    UnexpectedHttpStatus(u16),
    /// A transport error that is not worth retrying.
    Transport(String),
    /// HTTP 200 whose body has no usable `status` field.
    MalformedPayload(String),
    /// The job reached a failing terminal status, known or not.
    Remote(RemoteStatus),
    /// The caller cancelled the watch.
    Cancelled,
}

impl FailureKind {
    /// The remote tag, if the failure came from the job itself.
    pub fn error_tag(&self) -> Option<String> {
        match self {
            FailureKind::Remote(status) => Some(status.as_str().to_string()),
            _ => None,
        }
    }

    /// Operator-facing message. The wording is scraped by CI tooling.
    pub fn message(&self, dashboard_url: &str) -> String {
        match self {
            FailureKind::UnexpectedHttpStatus(code) => {
                format!("Request failed with status code {code}")
            }
            FailureKind::Transport(detail) => format!("Request to Harness failed: {detail}"),
            FailureKind::MalformedPayload(detail) => {
                format!("Malformed status payload from Harness: {detail}")
            }
            FailureKind::Remote(RemoteStatus::Failed) => {
                format!("Deployment has failed. See {dashboard_url} for details.")
            }
            FailureKind::Remote(RemoteStatus::Aborted) => {
                format!("Deployment was aborted. See {dashboard_url} for details.")
            }
            FailureKind::Remote(RemoteStatus::Rejected) => {
                format!("Deployment was rejected. See {dashboard_url} for details.")
            }
            FailureKind::Remote(other) => format!("Unknown status from Harness: {other}."),
            FailureKind::Cancelled => {
                "Watch cancelled before Harness reported a terminal status".to_string()
            }
        }
    }
}

/// Structured rejection of a watch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct WatchFailure {
    /// Remote status tag, or `None` for transport/HTTP-level failures.
    pub error: Option<String>,
    pub message: String,
    pub kind: FailureKind,
}

impl WatchFailure {
    pub fn new(kind: FailureKind, dashboard_url: &str) -> Self {
        Self {
            error: kind.error_tag(),
            message: kind.message(dashboard_url),
            kind,
        }
    }
}

/// Final value of a watch.
pub type WatchResult = std::result::Result<String, WatchFailure>;
