//! Component lookup for the Marionette GUI robot
//!
//! [`ComponentFinder`] searches the live hierarchy for components accepted
//! by a [`ComponentMatcher`], usually a [`MatchCriteria`]. Failed lookups
//! report the criteria together with a printout of the searched hierarchy.

mod finder;
mod hierarchy;
mod matcher;

pub use finder::ComponentFinder;
pub use hierarchy::{HierarchyPrinter, HierarchySnapshot, SnapshotEntry};
pub use matcher::{ComponentMatcher, MatchCriteria, TextPattern};
