//! Input synthesis for the Marionette GUI robot
//!
//! [`Robot`] moves the mouse, clicks, types and waits for the UI thread to
//! settle. Events reach the application through an [`InputDevice`]; the
//! [`EventQueueDevice`] posts them into a toolkit event loop.

mod device;
pub mod idle;
mod modifiers;
mod robot;

pub use device::{EventQueueDevice, InputDevice, InputError, InputResult, RecordingDevice};
pub use idle::wait_for_idle;
pub use modifiers::unify;
pub use robot::Robot;
