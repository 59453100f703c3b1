// src/client/mod.rs

//! Status Client abstraction.
//!
//! The watcher talks to a `StatusClient` instead of a concrete HTTP client.
//! Production code uses [`http::HttpStatusClient`]; tests plug in a scripted
//! client that replays canned replies.
//!
//! A client reports two very different things and keeps them apart:
//! - a [`StatusReply`] whenever the server answered, whatever the HTTP status
//! - a [`TransportError`] when no HTTP status was obtained at all

pub mod http;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub use self::http::HttpStatusClient;

/// Raw answer from the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub status_code: u16,
    pub body: String,
}

impl StatusReply {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// Broad category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The request or the body read timed out.
    Timeout,
    /// The connection could not be established or was lost before the
    /// response was read in full.
    Connect,
    /// Anything else (bad URL, TLS handshake, redirect policy).
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connection",
            TransportErrorKind::Other => "transport",
        };
        f.write_str(s)
    }
}

/// Failure to obtain any HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error: {detail}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, detail)
    }

    pub fn connect(detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, detail)
    }

    /// Timeouts and refused/reset connections are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Timeout | TransportErrorKind::Connect
        )
    }
}

/// Result of one status fetch.
pub type FetchResult = std::result::Result<StatusReply, TransportError>;

/// Trait abstracting how the deployment status is fetched.
pub trait StatusClient: Send + Sync {
    /// Issue one authenticated GET against `url`.
    fn fetch_status<'a>(
        &'a self,
        url: &'a str,
        auth_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send + 'a>>;
}
