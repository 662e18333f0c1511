//! Navigation and movement configuration

use serde::{Deserialize, Serialize};

/// Tag carried by the goal marker entity
pub const GOAL_TAG: &str = "GoalMarker";

/// Tag carried by blocking obstacles
pub const OBSTACLE_TAG: &str = "Obstacle";

/// Settings for the navigation agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Seconds between periodic route recomputes
    pub path_update_interval: f32,
    /// Seconds to stay suspended after touching an obstacle
    pub reroute_resume_delay: f32,
    /// Tag used to discover the goal
    pub goal_tag: String,
    /// Tag identifying obstacles
    pub obstacle_tag: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            path_update_interval: 0.5,
            reroute_resume_delay: 0.5,
            goal_tag: String::from(GOAL_TAG),
            obstacle_tag: String::from(OBSTACLE_TAG),
        }
    }
}

impl NavConfig {
    /// Set the periodic recompute interval
    pub fn with_path_update_interval(mut self, seconds: f32) -> Self {
        self.path_update_interval = seconds;
        self
    }

    /// Set the resume delay after obstacle contact
    pub fn with_reroute_resume_delay(mut self, seconds: f32) -> Self {
        self.reroute_resume_delay = seconds;
        self
    }

    /// Set the goal tag
    pub fn with_goal_tag(mut self, tag: impl Into<String>) -> Self {
        self.goal_tag = tag.into();
        self
    }

    /// Set the obstacle tag
    pub fn with_obstacle_tag(mut self, tag: impl Into<String>) -> Self {
        self.obstacle_tag = tag.into();
        self
    }

    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("path_update_interval", self.path_update_interval)?;
        non_negative("reroute_resume_delay", self.reroute_resume_delay)?;
        if self.goal_tag.is_empty() {
            return Err(ConfigError::EmptyTag("goal_tag"));
        }
        if self.obstacle_tag.is_empty() {
            return Err(ConfigError::EmptyTag("obstacle_tag"));
        }
        Ok(())
    }
}

/// Settings for the route-following mover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// Maximum speed in units per second
    pub max_speed: f32,
    /// Maximum acceleration in units per second squared
    pub max_acceleration: f32,
    /// Distance to the final corner at which the mover stops
    pub stopping_distance: f32,
    /// Distance at which an intermediate corner counts as passed
    pub corner_radius: f32,
    /// Distance from the final corner at which the mover starts slowing down
    pub slow_radius: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            max_speed: 3.5,
            max_acceleration: 8.0,
            stopping_distance: 0.5,
            corner_radius: 0.3,
            slow_radius: 2.0,
        }
    }
}

impl FollowerConfig {
    /// Set the maximum speed
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    /// Set the maximum acceleration
    pub fn with_max_acceleration(mut self, acceleration: f32) -> Self {
        self.max_acceleration = acceleration;
        self
    }

    /// Set the arrival tolerance
    pub fn with_stopping_distance(mut self, distance: f32) -> Self {
        self.stopping_distance = distance;
        self
    }

    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_speed", self.max_speed)?;
        positive("max_acceleration", self.max_acceleration)?;
        non_negative("stopping_distance", self.stopping_distance)?;
        non_negative("corner_radius", self.corner_radius)?;
        positive("slow_radius", self.slow_radius)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

/// Errors found while validating configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A numeric field is negative, zero where not allowed, or not finite
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// A tag field is empty
    EmptyTag(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { field, value } => write!(f, "{field} out of range: {value}"),
            Self::EmptyTag(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let nav = NavConfig::default();
        assert!((nav.path_update_interval - 0.5).abs() < f32::EPSILON);
        assert!((nav.reroute_resume_delay - 0.5).abs() < f32::EPSILON);
        assert_eq!(nav.goal_tag, GOAL_TAG);
        assert!(nav.validate().is_ok());
        assert!(FollowerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let nav = NavConfig::default().with_path_update_interval(-1.0);
        assert_eq!(
            nav.validate(),
            Err(ConfigError::OutOfRange {
                field: "path_update_interval",
                value: -1.0
            })
        );

        let nav = NavConfig::default().with_obstacle_tag("");
        assert_eq!(nav.validate(), Err(ConfigError::EmptyTag("obstacle_tag")));

        let follower = FollowerConfig::default().with_max_speed(f32::NAN);
        assert!(follower.validate().is_err());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let nav: NavConfig = ron::from_str("(path_update_interval: 0.25)").unwrap();
        assert!((nav.path_update_interval - 0.25).abs() < f32::EPSILON);
        assert_eq!(nav.obstacle_tag, OBSTACLE_TAG);
    }
}
