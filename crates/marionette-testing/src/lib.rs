//! Testing utilities for the Marionette GUI robot
//!
//! [`RobotFixture`] starts a UI thread and wires a robot and a finder
//! against it. [`samples`] builds small component trees to drive.

pub mod fixture;
pub mod samples;

pub use fixture::RobotFixture;

pub mod prelude {
    pub use crate::fixture::RobotFixture;
    pub use crate::samples;
    pub use marionette_core::prelude::*;
    pub use marionette_finder::{ComponentFinder, MatchCriteria};
    pub use marionette_input::Robot;
    pub use marionette_toolkit::prelude::*;
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod scenario_tests;
