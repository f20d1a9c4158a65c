//! Core of the Marionette GUI robot
//!
//! This crate provides the pieces every robot operation is built from:
//! - [`ActionDispatcher`]: runs queries and tasks on the UI thread
//! - [`pause`]: polling waits with timeouts
//! - [`ScreenLock`]: exclusive use of the display
//! - [`Settings`]: delays, timeouts and lookup scope
//! - [`RobotError`]: the error taxonomy

mod dispatcher;
mod error;
pub mod pause;
mod screen_lock;
mod settings;
pub mod validation;

pub use dispatcher::ActionDispatcher;
pub use error::*;
pub use pause::{condition, try_condition, wait_for, wait_until, Condition};
pub use screen_lock::{LockOwner, ScreenLock, ScreenLockGuard};
pub use settings::{ComponentLookupScope, Settings, MAX_DELAY};

pub mod prelude {
    pub use crate::dispatcher::ActionDispatcher;
    pub use crate::error::{BoxError, RobotError, RobotResult};
    pub use crate::pause::{condition, wait_until, Condition};
    pub use crate::settings::{ComponentLookupScope, Settings};
}
