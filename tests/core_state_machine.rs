// tests/core_state_machine.rs

use harness_watch::engine::{
    CoreCommand, Decision, FailureKind, PollOutcome, SUCCESS_MESSAGE, WatchCore,
};
use harness_watch::types::RemoteStatus;

const DASHBOARD: &str = "http://harness.com/watch-deployment";

fn failure_reports(commands: &[CoreCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, CoreCommand::ReportFailure(_)))
        .count()
}

#[test]
fn running_then_success_resolves() {
    let mut core = WatchCore::new(DASHBOARD);

    let step = core.step(PollOutcome::Continue(RemoteStatus::Running));
    assert_eq!(step.decision, Decision::PollAgain);
    assert_eq!(
        step.commands,
        vec![CoreCommand::Progress("Deployment status: RUNNING".into())]
    );

    let step = core.step(PollOutcome::Succeed);
    assert_eq!(step.decision, Decision::Resolve(SUCCESS_MESSAGE.to_string()));
    assert!(step.commands.is_empty());
    assert!(core.is_finished());
    assert_eq!(core.polls(), 2);
}

#[test]
fn unchanged_status_is_not_repeated() {
    let mut core = WatchCore::new(DASHBOARD);

    core.step(PollOutcome::Continue(RemoteStatus::Queued));
    let step = core.step(PollOutcome::Continue(RemoteStatus::Queued));
    assert!(step.commands.is_empty());

    let step = core.step(PollOutcome::Continue(RemoteStatus::Running));
    assert_eq!(step.commands.len(), 1);
    assert_eq!(core.last_status(), Some(&RemoteStatus::Running));
}

#[test]
fn terminal_failure_is_reported_once_and_sticks() {
    let mut core = WatchCore::new(DASHBOARD);

    let step = core.step(PollOutcome::Fail(FailureKind::Remote(RemoteStatus::Failed)));
    assert_eq!(failure_reports(&step.commands), 1);
    let Decision::Reject(failure) = step.decision.clone() else {
        panic!("expected rejection, got {:?}", step.decision);
    };
    assert_eq!(failure.error.as_deref(), Some("FAILED"));

    // Further input after the terminal step changes nothing.
    let again = core.step(PollOutcome::Fail(FailureKind::UnexpectedHttpStatus(500)));
    assert!(again.commands.is_empty());
    assert_eq!(again.decision, step.decision);

    let after_success = core.step(PollOutcome::Succeed);
    assert_eq!(after_success.decision, step.decision);
    assert_eq!(core.polls(), 1);
}

#[test]
fn transient_episode_reports_once_until_a_good_reply() {
    let mut core = WatchCore::new(DASHBOARD);

    let first = core.step(PollOutcome::RetryableError("timeout".into()));
    let second = core.step(PollOutcome::RetryableError("timeout".into()));
    assert_eq!(failure_reports(&first.commands), 1);
    assert_eq!(failure_reports(&second.commands), 0);
    assert_eq!(second.decision, Decision::PollAgain);

    core.step(PollOutcome::Continue(RemoteStatus::Running));
    let next_episode = core.step(PollOutcome::RetryableError("408".into()));
    assert_eq!(failure_reports(&next_episode.commands), 1);
}

#[test]
fn transient_report_does_not_consume_the_terminal_latch() {
    let mut core = WatchCore::new(DASHBOARD);

    core.step(PollOutcome::RetryableError("timeout".into()));
    let step = core.step(PollOutcome::Fail(FailureKind::UnexpectedHttpStatus(404)));

    assert_eq!(failure_reports(&step.commands), 1);
    assert_eq!(
        step.commands,
        vec![CoreCommand::ReportFailure("Request failed with status code 404".into())]
    );
}

#[test]
fn cancel_rejects_without_report() {
    let mut core = WatchCore::new(DASHBOARD);
    core.step(PollOutcome::Continue(RemoteStatus::Running));

    let step = core.cancel();
    assert!(step.commands.is_empty());
    match step.decision {
        Decision::Reject(failure) => {
            assert_eq!(failure.kind, FailureKind::Cancelled);
            assert_eq!(failure.error, None);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn cancel_after_success_keeps_success() {
    let mut core = WatchCore::new(DASHBOARD);
    core.step(PollOutcome::Succeed);

    assert_eq!(
        core.cancel().decision,
        Decision::Resolve(SUCCESS_MESSAGE.to_string())
    );
}
