// src/engine/runtime.rs

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::StatusClient;
use crate::engine::{CoreCommand, Decision, WatchCore, WatchRequest, WatchResult, classify};
use crate::notify::Notifier;

/// Drives one [`WatchCore`] against a live [`StatusClient`].
///
/// This is a pure IO shell: it fetches, sleeps, and forwards the core's
/// commands to the notifier. All decisions are made by the core.
///
/// A `Watcher` holds no per-watch state, so one instance can serve any
/// number of concurrent watches.
pub struct Watcher<C: StatusClient, N: Notifier> {
    client: C,
    notifier: N,
}

impl<C: StatusClient, N: Notifier> fmt::Debug for Watcher<C, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher").finish_non_exhaustive()
    }
}

impl<C: StatusClient, N: Notifier> Watcher<C, N> {
    pub fn new(client: C, notifier: N) -> Self {
        Self { client, notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Watch until the deployment reaches a terminal status.
    ///
    /// Transient errors are retried without limit; use [`Watcher::watch_until`]
    /// to bound the watch.
    pub async fn watch(&self, request: &WatchRequest) -> WatchResult {
        self.watch_until(request, &CancellationToken::new()).await
    }

    /// Same as [`Watcher::watch`], but gives up as soon as `cancel` fires.
    ///
    /// Cancellation drops the in-flight request or pending sleep and ends
    /// the watch with [`crate::engine::FailureKind::Cancelled`].
    pub async fn watch_until(
        &self,
        request: &WatchRequest,
        cancel: &CancellationToken,
    ) -> WatchResult {
        let mut core = WatchCore::new(request.dashboard_url.as_str());
        let wait = request.options.wait_between;

        info!(status_url = %request.status_url, ?wait, "watching deployment");

        loop {
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                fetched = self.client.fetch_status(&request.status_url, &request.auth_token) => Some(fetched),
            };

            let step = match fetched {
                Some(fetched) => {
                    let outcome = classify(&fetched, &request.options);
                    debug!(poll = core.polls() + 1, ?outcome, "classified status response");
                    core.step(outcome)
                }
                None => {
                    warn!(polls = core.polls(), "watch cancelled while waiting for Harness");
                    core.cancel()
                }
            };

            for command in step.commands {
                self.execute_command(command);
            }

            match step.decision {
                Decision::PollAgain => {}
                Decision::Resolve(message) => {
                    info!(polls = core.polls(), "deployment succeeded");
                    return Ok(message);
                }
                Decision::Reject(failure) => {
                    info!(
                        polls = core.polls(),
                        error = ?failure.error,
                        message = %failure.message,
                        "deployment watch failed"
                    );
                    return Err(failure);
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(polls = core.polls(), "watch cancelled between polls");
                    if let Decision::Reject(failure) = core.cancel().decision {
                        return Err(failure);
                    }
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    fn execute_command(&self, command: CoreCommand) {
        match command {
            CoreCommand::Progress(line) => {
                info!("{line}");
                self.notifier.progress(&line);
            }
            CoreCommand::ReportFailure(detail) => {
                warn!(%detail, "polling response error");
                self.notifier.failure(&detail);
            }
        }
    }
}
