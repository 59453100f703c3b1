use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Status tag reported by Harness for a deployment execution.
///
/// The known tags form a closed set; anything else is carried verbatim in
/// `Unknown` so it can be echoed back to the operator unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteStatus {
    Queued,
    Running,
    Success,
    Failed,
    Aborted,
    Rejected,
    Unknown(String),
}

impl RemoteStatus {
    /// Map a raw tag onto a status. Matching is exact and case-sensitive.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "QUEUED" => RemoteStatus::Queued,
            "RUNNING" => RemoteStatus::Running,
            "SUCCESS" => RemoteStatus::Success,
            "FAILED" => RemoteStatus::Failed,
            "ABORTED" => RemoteStatus::Aborted,
            "REJECTED" => RemoteStatus::Rejected,
            other => RemoteStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RemoteStatus::Queued => "QUEUED",
            RemoteStatus::Running => "RUNNING",
            RemoteStatus::Success => "SUCCESS",
            RemoteStatus::Failed => "FAILED",
            RemoteStatus::Aborted => "ABORTED",
            RemoteStatus::Rejected => "REJECTED",
            RemoteStatus::Unknown(raw) => raw,
        }
    }

    /// True for tags after which no further polling happens.
    ///
    /// `Unknown` counts as terminal: an unrecognised tag ends the watch
    /// unless the caller explicitly listed it as pending.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RemoteStatus::Queued | RemoteStatus::Running)
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RemoteStatus {
    fn from(tag: &str) -> Self {
        RemoteStatus::parse(tag)
    }
}

/// How the API key is attached to each status request.
///
/// - `ApiKey`: sent as an `x-api-key` header (Harness default).
/// - `Bearer`: sent as `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    #[default]
    ApiKey,
    Bearer,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api-key" | "apikey" => Ok(AuthScheme::ApiKey),
            "bearer" => Ok(AuthScheme::Bearer),
            other => Err(format!(
                "invalid auth_scheme: {other} (expected \"api-key\" or \"bearer\")"
            )),
        }
    }
}
