//! Scenario serialization and deserialization
//!
//! A scenario describes everything a navigation run needs: the walkable
//! grid, where the agent starts, the obstacles, the scripted pointer clicks
//! and the agent settings. Scenarios are stored as RON (Rusty Object
//! Notation) or JSON.

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3, Vec3Swizzles};
use serde::{Deserialize, Serialize};

use crate::ai::Grid;
use crate::core::{ConfigError, FollowerConfig, NavConfig};

/// Walkable area layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Width in cells (along X)
    pub width: usize,
    /// Height in cells (along Z)
    pub height: usize,
    /// Cell size in world units
    pub cell_size: f32,
    /// World XZ position of the grid's corner
    pub origin: Vec2,
    /// Cells that start out unwalkable
    #[serde(default)]
    pub blocked: Vec<(usize, usize)>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            cell_size: 1.0,
            origin: Vec2::new(-10.0, -10.0),
            blocked: Vec::new(),
        }
    }
}

/// A box that blocks the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleLayout {
    pub name: String,
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Whether the planner knows about the obstacle from the start. Unknown
    /// obstacles are only carved into the grid once the agent touches them.
    #[serde(default)]
    pub known: bool,
}

/// A pointer click replayed at a given frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedClick {
    pub frame: u64,
    /// Point on the ground the pointer is aimed at
    pub target: Vec3,
}

/// A serializable navigation scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Scenario version for compatibility
    pub version: u32,
    pub grid: GridLayout,
    pub agent_start: Vec3,
    /// Radius of the agent's contact sphere
    #[serde(default = "default_agent_radius")]
    pub agent_radius: f32,
    /// Ticks a route request stays pending
    #[serde(default)]
    pub pathfinder_latency: u32,
    #[serde(default)]
    pub obstacles: Vec<ObstacleLayout>,
    #[serde(default)]
    pub clicks: Vec<ScriptedClick>,
    #[serde(default)]
    pub nav: NavConfig,
    #[serde(default)]
    pub follower: FollowerConfig,
}

fn default_agent_radius() -> f32 {
    0.4
}

impl Scenario {
    /// Create a new scenario on the default grid with no obstacles or clicks
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            grid: GridLayout::default(),
            agent_start: Vec3::new(0.0, 0.5, 0.0),
            agent_radius: default_agent_radius(),
            pathfinder_latency: 0,
            obstacles: Vec::new(),
            clicks: Vec::new(),
            nav: NavConfig::default(),
            follower: FollowerConfig::default(),
        }
    }

    /// The scenario the demo runs without arguments: a known wall between
    /// the agent and its first goal, an unknown rock on the way back, and a
    /// goal replaced mid-route.
    #[must_use]
    pub fn demo() -> Self {
        let mut scenario = Self::new("Demo");
        scenario.agent_start = Vec3::new(-7.5, 0.5, -7.5);
        scenario.pathfinder_latency = 2;
        scenario.obstacles = vec![
            ObstacleLayout {
                name: String::from("Wall"),
                position: Vec3::new(0.0, 0.5, -2.0),
                half_extents: Vec3::new(0.5, 0.5, 6.0),
                known: true,
            },
            ObstacleLayout {
                name: String::from("Rock"),
                position: Vec3::new(-4.5, 0.5, 7.5),
                half_extents: Vec3::new(0.5, 0.5, 0.5),
                known: false,
            },
        ];
        scenario.clicks = vec![
            ScriptedClick {
                frame: 30,
                target: Vec3::new(7.5, 0.0, -7.5),
            },
            ScriptedClick {
                frame: 240,
                target: Vec3::new(7.5, 0.0, 7.5),
            },
            ScriptedClick {
                frame: 1200,
                target: Vec3::new(-7.5, 0.0, 7.5),
            },
        ];
        scenario
    }

    /// Build the navigation grid with blocked cells and known obstacles carved
    #[must_use]
    pub fn build_grid(&self) -> Grid {
        let layout = &self.grid;
        let mut grid =
            Grid::new(layout.width, layout.height, layout.cell_size).with_origin(layout.origin);

        for &(x, y) in &layout.blocked {
            grid.set_walkable(x, y, false);
        }
        for obstacle in self.obstacles.iter().filter(|o| o.known) {
            grid.block_region(obstacle.position.xz(), obstacle.half_extents.xz());
        }
        grid
    }

    /// Frame of the last scripted click, if any
    #[must_use]
    pub fn last_click_frame(&self) -> Option<u64> {
        self.clicks.iter().map(|c| c.frame).max()
    }

    /// Check the layout and the embedded settings
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::OutOfRange {
                field: "grid",
                value: (self.grid.width * self.grid.height) as f32,
            }
            .into());
        }
        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "cell_size",
                value: self.grid.cell_size,
            }
            .into());
        }
        if !(self.agent_radius.is_finite() && self.agent_radius > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "agent_radius",
                value: self.agent_radius,
            }
            .into());
        }
        self.nav.validate()?;
        self.follower.validate()?;
        Ok(())
    }

    /// Parse and validate a scenario from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_ron_str(content: &str) -> Result<Self, SceneError> {
        let scenario: Scenario =
            ron::from_str(content).map_err(|e| SceneError::DeserializeError(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Save the scenario to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| SceneError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a scenario from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, deserialization fails or
    /// the scenario is invalid
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the scenario to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| SceneError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| SceneError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a scenario from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, deserialization fails or
    /// the scenario is invalid
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::IoError(e.to_string()))?;
        let scenario: Scenario = serde_json::from_str(&content)
            .map_err(|e| SceneError::DeserializeError(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario, picking the format from the file extension
    ///
    /// # Errors
    ///
    /// See [`Scenario::load_ron`] and [`Scenario::load_json`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::load_json(path),
            _ => Self::load_ron(path),
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Errors that can occur during scenario operations
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// The scenario parsed but holds unusable values
    Invalid(ConfigError),
}

impl From<ConfigError> for SceneError {
    fn from(error: ConfigError) -> Self {
        Self::Invalid(error)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid scenario: {e}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(e) => Some(e),
            _ => None,
        }
    }
}
