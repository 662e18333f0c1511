//! AI and navigation module
//!
//! Provides the goal-seeking navigation agent, its collaborator traits, and
//! reference collaborators: grid pathfinding and a steering route follower.

mod agent;
mod follower;
mod navigation;
mod pathfinding;
mod state;
mod steering;

pub use agent::{NavContext, NavigationAgent};
pub use follower::RouteFollower;
pub use navigation::{Mover, Pathfinder, Route, RouteRenderer, SceneQuery};
pub use pathfinding::{Grid, GridPathfinder, PathResult, find_path};
pub use state::NavState;
pub use steering::{Arrive, SteeringBehavior, SteeringOutput};
