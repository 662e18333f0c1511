//! Goal-seeking navigation for a single agent
//!
//! This crate provides:
//! - A navigation agent state machine (discovery, replanning, arrival,
//!   reroute-and-resume on obstacle contact)
//! - Grid A* pathfinding and a steering route follower
//! - Entity Component System (ECS) scene lookup with hecs
//! - Physics contacts and pointer raycasts with rapier3d
//! - A headless fixed-step engine loop and RON/JSON scenarios

pub mod ai;
pub mod core;
pub mod ecs;
pub mod input;
pub mod physics;
pub mod renderer;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        Grid, GridPathfinder, Mover, NavContext, NavState, NavigationAgent, Pathfinder, Route,
        RouteFollower, RouteRenderer, SceneQuery,
    };
    pub use crate::core::{
        Engine, EngineConfig, EngineContext, EventQueue, FollowerConfig, Game, NavConfig, NavEvent,
        Scenario,
    };
    pub use crate::ecs::{Name, Tag, Transform, World};
    pub use crate::input::{GoalPublisher, PointerRay};
    pub use crate::physics::{ColliderHandle, Contact, Physics, RigidBodyHandle};
    pub use crate::renderer::LineRenderer;
    pub use glam::{Quat, Vec2, Vec3};
}
