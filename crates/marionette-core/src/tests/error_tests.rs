use super::*;
use std::error::Error as _;
use std::fmt;

#[derive(Debug)]
struct Checked;

impl fmt::Display for Checked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("checked failure")
    }
}

impl std::error::Error for Checked {}

#[test]
fn foreign_errors_become_unexpected_with_their_cause() {
    let err = RobotError::unexpected(Checked);
    let RobotError::Unexpected { source } = &err else {
        panic!("expected Unexpected");
    };
    assert!(source.downcast_ref::<Checked>().is_some());
    assert!(err.source().is_some());
    assert_eq!(err.to_string(), "unexpected failure: checked failure");
}

#[test]
fn expected_failures_pass_through_unwrapped() {
    let lookup = LookupError::NotFound {
        criteria: "name='ok'".into(),
        hierarchy: String::new(),
    };
    assert!(matches!(
        RobotError::unexpected(lookup),
        RobotError::ComponentLookup(_)
    ));

    let failed = ActionFailedError::new("not enabled");
    assert!(matches!(
        RobotError::unexpected(failed),
        RobotError::ActionFailed(_)
    ));

    let timeout = WaitTimedOutError {
        description: "window".into(),
        elapsed: Duration::from_millis(10),
        timeout: Duration::from_millis(5),
    };
    let err = RobotError::unexpected(RobotError::from(timeout));
    assert!(err.is_expected());
    assert!(matches!(err, RobotError::WaitTimedOut(_)));
}

#[test]
fn unexpected_is_never_wrapped_twice() {
    let once = RobotError::unexpected(Checked);
    let twice = RobotError::unexpected(once);
    let RobotError::Unexpected { source } = twice else {
        panic!("expected Unexpected");
    };
    assert!(source.downcast_ref::<Checked>().is_some());
}

#[test]
fn dispatcher_failures_inside_work_are_unexpected() {
    let err = RobotError::unexpected(RobotError::dispatcher_unavailable("gone"));
    let RobotError::Unexpected { source } = &err else {
        panic!("expected Unexpected");
    };
    assert!(matches!(
        source.downcast_ref::<RobotError>(),
        Some(RobotError::DispatcherUnavailable { .. })
    ));
    assert!(!err.is_expected());
}

#[test]
fn messages_carry_the_diagnostics() {
    let ambiguous = LookupError::Ambiguous {
        criteria: "type=TextField".into(),
        count: 2,
        matches: String::new(),
    };
    let text = ambiguous.to_string();
    assert!(text.contains("found 2 components"));
    assert!(text.contains("type=TextField"));
    assert_eq!(ambiguous.criteria(), "type=TextField");

    let timeout = WaitTimedOutError {
        description: "dialog to close".into(),
        elapsed: Duration::from_millis(512),
        timeout: Duration::from_millis(500),
    };
    assert_eq!(
        timeout.to_string(),
        "timed out waiting for dialog to close after 512ms (timeout 500ms)"
    );

    let lock = ScreenLockError::NotOwner {
        owner: "b".into(),
        holder: None,
    };
    assert_eq!(
        lock.to_string(),
        "b cannot release the screen lock held by nobody"
    );
}
