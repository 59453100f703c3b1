use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use harness_watch::client::{
    FetchResult, StatusClient, StatusReply, TransportError, TransportErrorKind,
};

#[derive(Debug, Clone)]
enum Step {
    Reply(FetchResult),
    /// Never answer; only cancellation gets the watcher out.
    Hang,
}

/// One request as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub auth_token: String,
}

/// A fake status client that:
/// - replays a fixed script of replies, one per request
/// - records every request it received
///
/// Clones share the script and the record, so a test can keep one handle
/// while the watcher owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStatusClient {
    script: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedStatusClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with body `{"status": "<tag>"}`.
    pub fn status(self, status_code: u16, tag: &str) -> Self {
        self.raw(status_code, format!(r#"{{"status":"{tag}"}}"#))
    }

    /// Queue a reply with an arbitrary body.
    pub fn raw(self, status_code: u16, body: impl Into<String>) -> Self {
        self.push(Step::Reply(Ok(StatusReply::new(status_code, body))))
    }

    pub fn timeout(self) -> Self {
        self.push(Step::Reply(Err(TransportError::timeout("operation timed out"))))
    }

    pub fn connect_error(self) -> Self {
        self.push(Step::Reply(Err(TransportError::connect("connection refused"))))
    }

    pub fn transport_error(self, detail: &str) -> Self {
        self.push(Step::Reply(Err(TransportError::new(TransportErrorKind::Other, detail))))
    }

    pub fn hang(self) -> Self {
        self.push(Step::Hang)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    fn push(self, step: Step) -> Self {
        self.script.lock().unwrap().push_back(step);
        self
    }
}

impl StatusClient for ScriptedStatusClient {
    fn fetch_status<'a>(
        &'a self,
        url: &'a str,
        auth_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send + 'a>> {
        {
            let mut guard = self.requests.lock().unwrap();
            guard.push(RecordedRequest {
                url: url.to_string(),
                auth_token: auth_token.to_string(),
            });
        }

        let next = self.script.lock().unwrap().pop_front();

        Box::pin(async move {
            match next {
                Some(Step::Reply(result)) => result,
                Some(Step::Hang) => std::future::pending().await,
                None => Err(TransportError::new(
                    TransportErrorKind::Other,
                    "scripted client has no replies left",
                )),
            }
        })
    }
}
