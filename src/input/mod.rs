//! Input handling module
//!
//! Turns pointer actions into goal placements.

mod goal_publisher;

pub use goal_publisher::{GoalPublisher, PointerRay};
