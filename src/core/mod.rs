//! Core engine module
//!
//! Contains the headless Engine, configuration, scenarios, events and timing

mod config;
mod engine;
mod events;
mod scene;
mod scheduler;
mod time;

pub use config::{ConfigError, FollowerConfig, GOAL_TAG, NavConfig, OBSTACLE_TAG};
pub use engine::{Engine, EngineConfig, EngineContext, EngineError, Game};
pub use events::{EventQueue, NavEvent};
pub use scene::{GridLayout, ObstacleLayout, Scenario, SceneError, ScriptedClick};
pub use scheduler::{Scheduler, TIMER_EPSILON, TaskHandle};
pub use time::Time;
