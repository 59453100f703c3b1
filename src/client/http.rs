// src/client/http.rs

//! `reqwest`-backed Status Client used in production.

use std::error::Error;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use crate::client::{FetchResult, StatusClient, StatusReply, TransportError, TransportErrorKind};
use crate::errors::Result;
use crate::types::AuthScheme;

/// Header Harness expects the API key in.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpStatusClient {
    client: reqwest::Client,
    auth_scheme: AuthScheme,
}

impl HttpStatusClient {
    /// Build a client whose every request is bounded by `request_timeout`.
    pub fn new(request_timeout: Duration, auth_scheme: AuthScheme) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("harness-watch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::from_client(client, auth_scheme))
    }

    /// Wrap an already configured `reqwest::Client`.
    pub fn from_client(client: reqwest::Client, auth_scheme: AuthScheme) -> Self {
        Self {
            client,
            auth_scheme,
        }
    }

    async fn get(&self, url: &str, auth_token: &str) -> FetchResult {
        let request = self.client.get(url);
        let request = match self.auth_scheme {
            AuthScheme::ApiKey => request.header(API_KEY_HEADER, auth_token),
            AuthScheme::Bearer => request.bearer_auth(auth_token),
        };

        let response = request.send().await.map_err(transport_error)?;
        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        debug!(url, status_code, bytes = body.len(), "status endpoint replied");

        Ok(StatusReply { status_code, body })
    }
}

impl StatusClient for HttpStatusClient {
    fn fetch_status<'a>(
        &'a self,
        url: &'a str,
        auth_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send + 'a>> {
        Box::pin(self.get(url, auth_token))
    }
}

/// Map a `reqwest` failure onto the retry taxonomy.
///
/// A request that reached the network and lost its connection (refused,
/// reset, closed mid-response, truncated body) is `Connect`. A TLS handshake
/// the server cannot complete is `Other`, like builder, URL and redirect
/// errors: retrying will not change the answer.
fn transport_error(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        if is_tls_failure(&err) {
            TransportErrorKind::Other
        } else {
            TransportErrorKind::Connect
        }
    } else if err.is_request() || err.is_body() || err.is_decode() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, error_chain(&err))
}

/// rustls handshake errors surface as `InvalidData` io errors.
fn is_tls_failure(err: &(dyn Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<io::Error>() {
            if io.kind() == io::ErrorKind::InvalidData {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

/// `outer: cause: root cause`, skipping causes that repeat their parent.
fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut detail = err.to_string();
    let mut last = detail.clone();
    let mut source = err.source();
    while let Some(cause) = source {
        let line = cause.to_string();
        if !line.is_empty() && !last.contains(&line) {
            detail.push_str(": ");
            detail.push_str(&line);
        }
        last = line;
        source = cause.source();
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("error sending request")
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_chain_joins_causes() {
        let err = Wrapper(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"));
        assert_eq!(error_chain(&err), "error sending request: connection reset by peer");
    }

    #[test]
    fn invalid_data_in_chain_is_tls() {
        let tls = Wrapper(io::Error::new(io::ErrorKind::InvalidData, "received corrupt message"));
        let reset = Wrapper(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert!(is_tls_failure(&tls));
        assert!(!is_tls_failure(&reset));
    }
}
