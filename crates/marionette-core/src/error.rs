//! Error taxonomy shared by every Marionette crate.
//!
//! Three failures are *expected*: a component lookup that found zero or too
//! many components, a wait that timed out, and an action whose preconditions
//! were not met. They always reach the caller as themselves. Anything else
//! raised inside dispatched work or input synthesis is reported as
//! [`RobotError::Unexpected`] with the original error as its source.

use std::time::Duration;
use thiserror::Error;

/// Error type returned by work closures run on the UI thread.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type RobotResult<T> = Result<T, RobotError>;

#[derive(Error, Debug)]
pub enum RobotError {
    /// An unanticipated failure inside UI-thread work or input synthesis.
    #[error("unexpected failure: {source}")]
    Unexpected {
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    ComponentLookup(#[from] LookupError),

    #[error(transparent)]
    WaitTimedOut(#[from] WaitTimedOutError),

    #[error(transparent)]
    ActionFailed(#[from] ActionFailedError),

    /// The UI thread is gone or dropped the request before answering.
    #[error("action dispatcher unavailable: {reason}")]
    DispatcherUnavailable { reason: String },

    #[error(transparent)]
    ScreenLock(#[from] ScreenLockError),
}

impl RobotError {
    /// Wraps `cause` as [`RobotError::Unexpected`].
    ///
    /// Expected failures pass through unwrapped and an error that is already
    /// `Unexpected` is returned as is.
    pub fn unexpected(cause: impl Into<BoxError>) -> RobotError {
        let cause = cause.into();
        let cause = match cause.downcast::<RobotError>() {
            Ok(robot) => {
                if matches!(
                    *robot,
                    RobotError::DispatcherUnavailable { .. } | RobotError::ScreenLock(_)
                ) {
                    return RobotError::Unexpected { source: robot };
                }
                return *robot;
            }
            Err(cause) => cause,
        };
        let cause = match cause.downcast::<LookupError>() {
            Ok(lookup) => return RobotError::ComponentLookup(*lookup),
            Err(cause) => cause,
        };
        let cause = match cause.downcast::<WaitTimedOutError>() {
            Ok(timeout) => return RobotError::WaitTimedOut(*timeout),
            Err(cause) => cause,
        };
        match cause.downcast::<ActionFailedError>() {
            Ok(failed) => RobotError::ActionFailed(*failed),
            Err(source) => RobotError::Unexpected { source },
        }
    }

    pub fn dispatcher_unavailable(reason: impl Into<String>) -> RobotError {
        RobotError::DispatcherUnavailable {
            reason: reason.into(),
        }
    }

    /// Lookup, wait timeout and precondition failures.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            RobotError::ComponentLookup(_)
                | RobotError::WaitTimedOut(_)
                | RobotError::ActionFailed(_)
        )
    }
}

/// Zero or several components matched where exactly one was required.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unable to find component using matcher {criteria}\n\ncomponent hierarchy:\n{hierarchy}")]
    NotFound { criteria: String, hierarchy: String },

    #[error("found {count} components using matcher {criteria}:\n{matches}")]
    Ambiguous {
        criteria: String,
        count: usize,
        matches: String,
    },
}

impl LookupError {
    pub fn criteria(&self) -> &str {
        match self {
            LookupError::NotFound { criteria, .. } | LookupError::Ambiguous { criteria, .. } => {
                criteria
            }
        }
    }
}

/// A polled condition never became true.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "timed out waiting for {description} after {}ms (timeout {}ms)",
    .elapsed.as_millis(),
    .timeout.as_millis()
)]
pub struct WaitTimedOutError {
    pub description: String,
    /// Never shorter than `timeout`.
    pub elapsed: Duration,
    pub timeout: Duration,
}

/// The preconditions of a requested action were not met.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ActionFailedError {
    pub message: String,
}

impl ActionFailedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn not_showing(component: impl std::fmt::Display) -> Self {
        Self::new(format!(
            "expecting component {component} to be showing on the screen"
        ))
    }

    pub fn not_enabled(component: impl std::fmt::Display) -> Self {
        Self::new(format!("expecting component {component} to be enabled"))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenLockError {
    #[error("{owner} cannot release the screen lock held by {}", .holder.as_deref().unwrap_or("nobody"))]
    NotOwner {
        owner: String,
        holder: Option<String>,
    },
}

/// A panic caught while running work on the UI thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("work panicked on the UI thread: {message}")]
pub struct PanicError {
    pub message: String,
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
