// tests/classify_responses.rs

use proptest::prelude::*;

use harness_watch::client::{FetchResult, StatusReply, TransportError, TransportErrorKind};
use harness_watch::engine::{FailureKind, PollOptions, PollOutcome, classify};
use harness_watch::types::RemoteStatus;

fn reply(status_code: u16, tag: &str) -> FetchResult {
    Ok(StatusReply::new(status_code, format!(r#"{{"status":"{tag}"}}"#)))
}

#[test]
fn non_terminal_statuses_continue() {
    let options = PollOptions::default();

    assert_eq!(
        classify(&reply(200, "RUNNING"), &options),
        PollOutcome::Continue(RemoteStatus::Running)
    );
    assert_eq!(
        classify(&reply(200, "QUEUED"), &options),
        PollOutcome::Continue(RemoteStatus::Queued)
    );
}

#[test]
fn success_status_succeeds() {
    assert_eq!(
        classify(&reply(200, "SUCCESS"), &PollOptions::default()),
        PollOutcome::Succeed
    );
}

#[test]
fn failing_statuses_fail_with_their_tag() {
    let options = PollOptions::default();

    for (tag, status) in [
        ("FAILED", RemoteStatus::Failed),
        ("ABORTED", RemoteStatus::Aborted),
        ("REJECTED", RemoteStatus::Rejected),
    ] {
        assert_eq!(
            classify(&reply(200, tag), &options),
            PollOutcome::Fail(FailureKind::Remote(status))
        );
    }
}

#[test]
fn status_matching_is_case_sensitive() {
    assert_eq!(
        classify(&reply(200, "running"), &PollOptions::default()),
        PollOutcome::Fail(FailureKind::Remote(RemoteStatus::Unknown("running".into())))
    );
}

#[test]
fn http_status_is_checked_before_payload() {
    // 201 carries a perfectly good RUNNING payload, but is still terminal.
    assert_eq!(
        classify(&reply(201, "RUNNING"), &PollOptions::default()),
        PollOutcome::Fail(FailureKind::UnexpectedHttpStatus(201))
    );
}

#[test]
fn request_timeout_status_is_retryable() {
    let outcome = classify(&reply(408, "whatever"), &PollOptions::default());
    assert!(matches!(outcome, PollOutcome::RetryableError(detail) if detail.contains("408")));
}

#[test]
fn transport_errors_split_by_kind() {
    let options = PollOptions::default();

    let timeout: FetchResult = Err(TransportError::timeout("deadline exceeded"));
    assert!(matches!(classify(&timeout, &options), PollOutcome::RetryableError(_)));

    let refused: FetchResult = Err(TransportError::connect("connection refused"));
    assert!(matches!(classify(&refused, &options), PollOutcome::RetryableError(_)));

    let other: FetchResult = Err(TransportError::new(TransportErrorKind::Other, "bad url"));
    assert!(matches!(
        classify(&other, &options),
        PollOutcome::Fail(FailureKind::Transport(detail)) if detail.contains("bad url")
    ));
}

#[test]
fn payload_without_status_is_malformed() {
    let outcome = classify(&Ok(StatusReply::new(200, r#"{"state":"RUNNING"}"#)), &PollOptions::default());
    assert!(matches!(outcome, PollOutcome::Fail(FailureKind::MalformedPayload(_))));
}

#[test]
fn extra_fields_in_payload_are_ignored() {
    let body = r#"{"status":"SUCCESS","pipelineExecutionId":"abc","tags":[]}"#;
    assert_eq!(
        classify(&Ok(StatusReply::new(200, body)), &PollOptions::default()),
        PollOutcome::Succeed
    );
}

#[test]
fn failure_messages_keep_their_wording() {
    let dashboard = "http://harness.com/watch-deployment";

    assert_eq!(
        FailureKind::Remote(RemoteStatus::Unknown("UH OH".into())).message(dashboard),
        "Unknown status from Harness: UH OH."
    );
    assert_eq!(
        FailureKind::UnexpectedHttpStatus(502).message(dashboard),
        "Request failed with status code 502"
    );
    assert!(FailureKind::Remote(RemoteStatus::Failed)
        .message(dashboard)
        .contains(dashboard));
    assert_eq!(FailureKind::UnexpectedHttpStatus(502).error_tag(), None);
    assert_eq!(
        FailureKind::Remote(RemoteStatus::Rejected).error_tag().as_deref(),
        Some("REJECTED")
    );
}

#[test]
fn negative_wait_between_is_rejected() {
    assert!(PollOptions::from_secs_f64(-1.0).is_err());
    assert!(PollOptions::from_secs_f64(f64::NAN).is_err());
    assert_eq!(
        PollOptions::from_secs_f64(0.0).unwrap().wait_between,
        std::time::Duration::ZERO
    );
}

fn fetch_result_strategy() -> impl Strategy<Value = FetchResult> {
    let tag = prop_oneof![
        Just("RUNNING".to_string()),
        Just("QUEUED".to_string()),
        Just("SUCCESS".to_string()),
        Just("FAILED".to_string()),
        Just("ABORTED".to_string()),
        Just("REJECTED".to_string()),
        "[A-Z_]{1,12}",
    ];
    prop_oneof![
        (prop_oneof![Just(200u16), Just(408u16), 100u16..600], tag)
            .prop_map(|(code, tag)| reply(code, &tag)),
        "[ -~]{0,24}".prop_map(|body| -> FetchResult { Ok(StatusReply::new(200, body)) }),
        Just::<FetchResult>(Err(TransportError::timeout("timed out"))),
        Just::<FetchResult>(Err(TransportError::connect("refused"))),
        Just::<FetchResult>(Err(TransportError::new(TransportErrorKind::Other, "boom"))),
    ]
}

proptest! {
    #[test]
    fn classification_is_deterministic(fetched in fetch_result_strategy()) {
        let options = PollOptions::default();
        let first = classify(&fetched, &options);
        for _ in 0..3 {
            prop_assert_eq!(&classify(&fetched, &options), &first);
        }
    }

    #[test]
    fn unknown_tags_fail_with_the_literal(tag in "[A-Z ]{1,16}") {
        prop_assume!(!matches!(
            tag.as_str(),
            "RUNNING" | "QUEUED" | "SUCCESS" | "FAILED" | "ABORTED" | "REJECTED"
        ));
        match classify(&reply(200, &tag), &PollOptions::default()) {
            PollOutcome::Fail(kind) => {
                prop_assert_eq!(kind.error_tag(), Some(tag.clone()));
                prop_assert_eq!(kind.message("x"), format!("Unknown status from Harness: {tag}."));
            }
            other => prop_assert!(false, "expected failure, got {:?}", other),
        }
    }

    #[test]
    fn non_ok_non_retryable_status_is_terminal(code in 100u16..600) {
        prop_assume!(code != 200 && code != 408);
        let outcome = classify(&reply(code, "RUNNING"), &PollOptions::default());
        prop_assert_eq!(outcome, PollOutcome::Fail(FailureKind::UnexpectedHttpStatus(code)));
    }
}
