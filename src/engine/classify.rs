// src/engine/classify.rs

//! Response classification.
//!
//! The HTTP-level outcome is inspected before the payload: only a 200 gets
//! its body decoded.

use serde::Deserialize;

use crate::client::FetchResult;
use crate::engine::{FailureKind, PollOptions, PollOutcome};
use crate::types::RemoteStatus;

/// Shape of the status payload. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: String,
}

/// Classify one fetch result.
///
/// Pure: the same `fetched` and `options` always give the same outcome.
pub fn classify(fetched: &FetchResult, options: &PollOptions) -> PollOutcome {
    let reply = match fetched {
        Ok(reply) => reply,
        Err(err) if err.is_transient() => return PollOutcome::RetryableError(err.to_string()),
        Err(err) => return PollOutcome::Fail(FailureKind::Transport(err.to_string())),
    };

    match reply.status_code {
        200 => classify_payload(&reply.body, options),
        code if options.is_retryable_status(code) => {
            PollOutcome::RetryableError(format!("Request failed with status code {code}"))
        }
        code => PollOutcome::Fail(FailureKind::UnexpectedHttpStatus(code)),
    }
}

fn classify_payload(body: &str, options: &PollOptions) -> PollOutcome {
    let payload: StatusPayload = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => return PollOutcome::Fail(FailureKind::MalformedPayload(e.to_string())),
    };

    match RemoteStatus::parse(&payload.status) {
        status @ (RemoteStatus::Queued | RemoteStatus::Running) => PollOutcome::Continue(status),
        RemoteStatus::Success => PollOutcome::Succeed,
        RemoteStatus::Unknown(tag) if options.is_pending_tag(&tag) => {
            PollOutcome::Continue(RemoteStatus::Unknown(tag))
        }
        failed => PollOutcome::Fail(FailureKind::Remote(failed)),
    }
}
