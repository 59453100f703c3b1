// src/engine/core.rs

//! Pure core state machine for one watch.
//!
//! [`WatchCore`] consumes [`PollOutcome`]s and produces:
//! - an updated core state
//! - a list of [`CoreCommand`]s for the notifier
//! - a [`Decision`] telling the async shell whether to poll again
//!
//! It has no channels, no Tokio types, and performs no IO.

use tracing::debug;

use crate::engine::{FailureKind, PollOutcome, SUCCESS_MESSAGE, WatchFailure};
use crate::types::RemoteStatus;

/// Output line the shell should hand to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    Progress(String),
    ReportFailure(String),
}

/// What the shell does after executing the commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Sleep `wait_between`, then fetch again.
    PollAgain,
    /// Terminal success.
    Resolve(String),
    /// Terminal failure.
    Reject(WatchFailure),
}

impl Decision {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Decision::PollAgain)
    }
}

/// Result of feeding one outcome into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    pub decision: Decision,
}

/// State of one watch.
///
/// Two latches live here:
/// - `failure_reported` guarantees a single terminal failure report
/// - `in_transient_episode` collapses back-to-back transient errors into
///   one report; the next HTTP 200 closes the episode
#[derive(Debug)]
pub struct WatchCore {
    dashboard_url: String,
    polls: u32,
    last_status: Option<RemoteStatus>,
    in_transient_episode: bool,
    failure_reported: bool,
    terminal: Option<Decision>,
}

impl WatchCore {
    pub fn new(dashboard_url: impl Into<String>) -> Self {
        Self {
            dashboard_url: dashboard_url.into(),
            polls: 0,
            last_status: None,
            in_transient_episode: false,
            failure_reported: false,
            terminal: None,
        }
    }

    /// Number of outcomes consumed before the watch ended.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn last_status(&self) -> Option<&RemoteStatus> {
        self.last_status.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.terminal.is_some()
    }

    /// Feed one classified outcome.
    ///
    /// Once a terminal decision was reached, every further call returns that
    /// same decision with no commands.
    pub fn step(&mut self, outcome: PollOutcome) -> CoreStep {
        if let Some(decision) = &self.terminal {
            return CoreStep {
                commands: Vec::new(),
                decision: decision.clone(),
            };
        }

        self.polls = self.polls.saturating_add(1);
        let mut commands = Vec::new();

        let decision = match outcome {
            PollOutcome::Continue(status) => {
                self.in_transient_episode = false;
                if self.last_status.as_ref() != Some(&status) {
                    commands.push(CoreCommand::Progress(format!("Deployment status: {status}")));
                    self.last_status = Some(status);
                }
                Decision::PollAgain
            }
            PollOutcome::Succeed => {
                self.in_transient_episode = false;
                self.last_status = Some(RemoteStatus::Success);
                Decision::Resolve(SUCCESS_MESSAGE.to_string())
            }
            PollOutcome::RetryableError(detail) => {
                if !self.in_transient_episode {
                    self.in_transient_episode = true;
                    commands.push(CoreCommand::ReportFailure(detail));
                } else {
                    debug!(poll = self.polls, %detail, "transient error repeated; not reported again");
                }
                Decision::PollAgain
            }
            PollOutcome::Fail(kind) => {
                if let FailureKind::Remote(status) = &kind {
                    self.last_status = Some(status.clone());
                }
                self.reject(kind, &mut commands)
            }
        };

        self.finish(CoreStep { commands, decision })
    }

    /// End the watch because the caller gave up. No failure is reported.
    pub fn cancel(&mut self) -> CoreStep {
        if let Some(decision) = &self.terminal {
            return CoreStep {
                commands: Vec::new(),
                decision: decision.clone(),
            };
        }
        let failure = WatchFailure::new(FailureKind::Cancelled, &self.dashboard_url);
        self.finish(CoreStep {
            commands: Vec::new(),
            decision: Decision::Reject(failure),
        })
    }

    fn reject(&mut self, kind: FailureKind, commands: &mut Vec<CoreCommand>) -> Decision {
        let failure = WatchFailure::new(kind, &self.dashboard_url);
        if !self.failure_reported {
            self.failure_reported = true;
            commands.push(CoreCommand::ReportFailure(failure.message.clone()));
        }
        Decision::Reject(failure)
    }

    fn finish(&mut self, step: CoreStep) -> CoreStep {
        if step.decision.is_terminal() {
            self.terminal = Some(step.decision.clone());
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_counter_saturates() {
        let mut core = WatchCore::new("https://dashboard");
        core.polls = u32::MAX;

        let step = core.step(PollOutcome::RetryableError("timeout".into()));

        assert_eq!(core.polls(), u32::MAX);
        assert_eq!(step.decision, Decision::PollAgain);
    }
}
