//! Polling waits.
//!
//! A wait blocks only the calling thread. It ends when its condition holds or
//! its timeout elapses; nothing else can cancel it.

use crate::error::{RobotResult, WaitTimedOutError};
use crate::settings::Settings;
use std::thread;
use std::time::Duration;
use web_time::Instant;

/// Pause between two evaluations of a condition.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Something to wait for.
pub trait Condition {
    /// Whether the condition holds now. An error aborts the wait.
    fn test(&mut self) -> RobotResult<bool>;

    /// Shown in the timeout error.
    fn description(&self) -> String;
}

impl<C: Condition + ?Sized> Condition for &mut C {
    fn test(&mut self) -> RobotResult<bool> {
        (**self).test()
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

impl<C: Condition + ?Sized> Condition for Box<C> {
    fn test(&mut self) -> RobotResult<bool> {
        (**self).test()
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// Condition backed by a closure.
pub struct FnCondition<F> {
    description: String,
    test: F,
}

impl<F> Condition for FnCondition<F>
where
    F: FnMut() -> RobotResult<bool>,
{
    fn test(&mut self) -> RobotResult<bool> {
        (self.test)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

impl<F> std::fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Builds a condition from an infallible check.
pub fn condition(
    description: impl Into<String>,
    mut test: impl FnMut() -> bool,
) -> FnCondition<impl FnMut() -> RobotResult<bool>> {
    FnCondition {
        description: description.into(),
        test: move || Ok(test()),
    }
}

/// Builds a condition from a check that may fail, such as one that queries
/// the UI thread.
pub fn try_condition<F>(description: impl Into<String>, test: F) -> FnCondition<F>
where
    F: FnMut() -> RobotResult<bool>,
{
    FnCondition {
        description: description.into(),
        test,
    }
}

/// Polls `condition` every `interval` until it holds or `timeout` elapses.
///
/// The condition is evaluated at least once, even with a zero timeout. On
/// timeout the error reports an elapsed time of at least `timeout`.
pub fn wait_until<C>(mut condition: C, timeout: Duration, interval: Duration) -> RobotResult<()>
where
    C: Condition,
{
    let start = Instant::now();
    loop {
        if condition.test()? {
            return Ok(());
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(WaitTimedOutError {
                description: condition.description(),
                elapsed,
                timeout,
            }
            .into());
        }
        thread::sleep(interval.min(timeout - elapsed));
    }
}

/// [`wait_until`] with the default timeout from `settings` and the default
/// poll interval.
pub fn wait_until_default<C>(condition: C, settings: &Settings) -> RobotResult<()>
where
    C: Condition,
{
    wait_until(condition, settings.default_timeout(), DEFAULT_POLL_INTERVAL)
}

/// Waits until every condition holds.
///
/// Conditions are checked in order; once one holds it is not checked again.
/// The timeout error names the first condition that never held.
pub fn wait_until_all(
    conditions: &mut [&mut dyn Condition],
    timeout: Duration,
    interval: Duration,
) -> RobotResult<()> {
    let start = Instant::now();
    let mut next = 0;
    loop {
        while let Some(condition) = conditions.get_mut(next) {
            if !condition.test()? {
                break;
            }
            next += 1;
        }
        let Some(pending) = conditions.get(next) else {
            return Ok(());
        };
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(WaitTimedOutError {
                description: pending.description(),
                elapsed,
                timeout,
            }
            .into());
        }
        thread::sleep(interval.min(timeout - elapsed));
    }
}

/// Sleeps for `duration`.
pub fn wait_for(duration: Duration) {
    thread::sleep(duration);
}

#[cfg(test)]
#[path = "tests/pause_tests.rs"]
mod tests;
