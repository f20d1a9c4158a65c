use super::*;
use crate::error::{ActionFailedError, RobotError};

#[test]
fn always_false_times_out_after_at_least_the_timeout() {
    let timeout = Duration::from_millis(500);
    let start = Instant::now();
    let err = wait_until(condition("never", || false), timeout, DEFAULT_POLL_INTERVAL)
        .expect_err("times out");

    assert!(start.elapsed() >= timeout);
    let RobotError::WaitTimedOut(timed_out) = err else {
        panic!("expected WaitTimedOut");
    };
    assert!(timed_out.elapsed >= timeout);
    assert_eq!(timed_out.timeout, timeout);
    assert_eq!(timed_out.description, "never");
}

#[test]
fn default_wait_uses_the_given_settings_timeout() {
    let settings = Settings::new()
        .with_default_timeout(Duration::from_millis(50));
    let start = Instant::now();
    let err = wait_until_default(condition("never", || false), &settings)
        .expect_err("times out");

    let RobotError::WaitTimedOut(timed_out) = err else {
        panic!("expected WaitTimedOut");
    };
    assert_eq!(timed_out.timeout, Duration::from_millis(50));
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn condition_is_checked_once_even_with_zero_timeout() {
    let mut calls = 0;
    let result = wait_until(
        condition("counted", || {
            calls += 1;
            true
        }),
        Duration::ZERO,
        DEFAULT_POLL_INTERVAL,
    );
    assert!(result.is_ok());
    assert_eq!(calls, 1);
}

#[test]
fn polls_until_the_condition_holds() {
    let mut remaining = 3;
    let mut check = condition("countdown", || {
        remaining -= 1;
        remaining == 0
    });
    wait_until(&mut check, Duration::from_secs(5), Duration::from_millis(1)).expect("holds");
    drop(check);
    assert_eq!(remaining, 0);
}

#[test]
fn errors_from_the_condition_abort_the_wait() {
    let mut calls = 0;
    let err = wait_until(
        try_condition("failing", || {
            calls += 1;
            Err(ActionFailedError::new("component vanished").into())
        }),
        Duration::from_secs(5),
        DEFAULT_POLL_INTERVAL,
    )
    .expect_err("aborts");
    assert!(matches!(err, RobotError::ActionFailed(_)));
    assert_eq!(calls, 1);
}

#[test]
fn wait_until_all_names_the_first_unsatisfied_condition() {
    let mut ready = condition("window shown", || true);
    let mut never = condition("dialog closed", || false);
    let mut later = condition("status updated", || false);

    let err = wait_until_all(
        &mut [
            &mut ready as &mut dyn Condition,
            &mut never as &mut dyn Condition,
            &mut later as &mut dyn Condition,
        ],
        Duration::from_millis(30),
        Duration::from_millis(5),
    )
    .expect_err("times out");

    let RobotError::WaitTimedOut(timed_out) = err else {
        panic!("expected WaitTimedOut");
    };
    assert_eq!(timed_out.description, "dialog closed");
}

#[test]
fn wait_until_all_succeeds_when_every_condition_holds() {
    let mut first = condition("first", || true);
    let mut second = condition("second", || true);
    wait_until_all(
        &mut [
            &mut first as &mut dyn Condition,
            &mut second as &mut dyn Condition,
        ],
        Duration::ZERO,
        DEFAULT_POLL_INTERVAL,
    )
    .expect("all hold");
}

#[test]
fn wait_for_sleeps() {
    let start = Instant::now();
    wait_for(Duration::from_millis(20));
    assert!(start.elapsed() >= Duration::from_millis(20));
}
