//! Steering behaviors for AI movement
//!
//! Arrive behavior used to drive an agent from corner to corner along a route.

use glam::Vec3;

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct SteeringOutput {
    /// Linear acceleration
    pub linear: Vec3,
    /// Angular acceleration (yaw)
    pub angular: f32,
}

impl SteeringOutput {
    /// Zero steering
    pub const ZERO: Self = Self {
        linear: Vec3::ZERO,
        angular: 0.0,
    };
}

/// Trait for steering behaviors
pub trait SteeringBehavior {
    /// Calculate steering based on agent state
    fn calculate(&self, position: Vec3, velocity: Vec3) -> SteeringOutput;
}

/// Arrive behavior - move towards target and slow down
#[derive(Debug, Clone)]
pub struct Arrive {
    /// Target position
    pub target: Vec3,
    /// Maximum acceleration
    pub max_acceleration: f32,
    /// Maximum speed
    pub max_speed: f32,
    /// Slowing distance
    pub slow_radius: f32,
    /// Stopping distance
    pub target_radius: f32,
}

impl Arrive {
    /// Create a new arrive behavior
    #[must_use]
    pub fn new(target: Vec3, max_acceleration: f32, max_speed: f32) -> Self {
        Self {
            target,
            max_acceleration,
            max_speed,
            slow_radius: 5.0,
            target_radius: 0.5,
        }
    }

    /// Set the slowing and stopping distances
    #[must_use]
    pub fn with_radii(mut self, slow_radius: f32, target_radius: f32) -> Self {
        self.slow_radius = slow_radius;
        self.target_radius = target_radius;
        self
    }
}

impl SteeringBehavior for Arrive {
    fn calculate(&self, position: Vec3, velocity: Vec3) -> SteeringOutput {
        let to_target = self.target - position;
        let distance = to_target.length();

        if distance < self.target_radius {
            return SteeringOutput::ZERO;
        }

        let target_speed = if distance > self.slow_radius {
            self.max_speed
        } else {
            self.max_speed * distance / self.slow_radius
        };

        let target_velocity = to_target.normalize_or_zero() * target_speed;
        let acceleration = target_velocity - velocity;

        let accel_magnitude = acceleration.length();
        if accel_magnitude > self.max_acceleration {
            return SteeringOutput {
                linear: acceleration.normalize_or_zero() * self.max_acceleration,
                angular: 0.0,
            };
        }

        SteeringOutput {
            linear: acceleration,
            angular: 0.0,
        }
    }
}
