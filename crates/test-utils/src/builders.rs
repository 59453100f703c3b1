#![allow(dead_code)]

use std::time::Duration;

use harness_watch::engine::{PollOptions, WatchRequest};

pub const STATUS_URL: &str = "http://harness.com/deployment-api-endpoint";
pub const DASHBOARD_URL: &str = "http://harness.com/watch-deployment";
pub const API_KEY: &str = "HARNESS_TEST_API_KEY";

/// Builder for `WatchRequest` to simplify test setup.
///
/// Defaults to the fixture URLs above and a short 10ms wait.
pub struct WatchRequestBuilder {
    request: WatchRequest,
}

impl WatchRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: WatchRequest {
                status_url: STATUS_URL.to_string(),
                dashboard_url: DASHBOARD_URL.to_string(),
                auth_token: API_KEY.to_string(),
                options: PollOptions {
                    wait_between: Duration::from_millis(10),
                    ..PollOptions::default()
                },
            },
        }
    }

    pub fn status_url(mut self, url: &str) -> Self {
        self.request.status_url = url.to_string();
        self
    }

    pub fn auth_token(mut self, token: &str) -> Self {
        self.request.auth_token = token.to_string();
        self
    }

    pub fn wait_between(mut self, wait: Duration) -> Self {
        self.request.options.wait_between = wait;
        self
    }

    pub fn retry_on(mut self, status_code: u16) -> Self {
        self.request.options.retryable_statuses.push(status_code);
        self
    }

    pub fn pending(mut self, tag: &str) -> Self {
        self.request.options.pending_statuses.push(tag.to_string());
        self
    }

    pub fn build(self) -> WatchRequest {
        self.request
    }
}

impl Default for WatchRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
