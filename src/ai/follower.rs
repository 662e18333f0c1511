//! Kinematic route follower
//!
//! A `Mover` that steers a point along route corners with the arrive
//! behavior. The host copies the resulting position into the physics body.

use glam::Vec3;

use crate::ai::{Arrive, Mover, Route, SteeringBehavior};
use crate::core::FollowerConfig;

/// Drives the agent along the latest route it was given.
#[derive(Debug, Clone)]
pub struct RouteFollower {
    config: FollowerConfig,
    position: Vec3,
    velocity: Vec3,
    suspended: bool,
    on_surface: bool,
    /// Corners of the route being followed
    corners: Vec<Vec3>,
    route_id: Option<u64>,
    /// Index of the corner currently steered toward
    next_corner: usize,
}

impl RouteFollower {
    /// Create a suspended follower standing at `position`
    #[must_use]
    pub fn new(config: FollowerConfig, position: Vec3) -> Self {
        Self {
            config,
            position,
            velocity: Vec3::ZERO,
            suspended: true,
            on_surface: true,
            corners: Vec::new(),
            route_id: None,
            next_corner: 0,
        }
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether the follower moved during the last `advance`
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.velocity != Vec3::ZERO
    }

    /// Update surface membership, as reported by the host
    pub fn set_on_surface(&mut self, on_surface: bool) {
        self.on_surface = on_surface;
    }

    /// Move along the route for `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if self.suspended {
            self.velocity = Vec3::ZERO;
            return;
        }
        let Some(&target) = self.corners.get(self.next_corner) else {
            self.velocity = Vec3::ZERO;
            return;
        };

        let is_last = self.next_corner + 1 == self.corners.len();
        if is_last && self.position.distance(target) <= self.config.stopping_distance {
            self.velocity = Vec3::ZERO;
            return;
        }

        // Full speed through intermediate corners, slow down for the last one
        let arrive = Arrive::new(target, self.config.max_acceleration, self.config.max_speed);
        let arrive = if is_last {
            arrive.with_radii(self.config.slow_radius, self.config.stopping_distance)
        } else {
            arrive.with_radii(0.0, 0.0)
        };

        let steering = arrive.calculate(self.position, self.velocity);
        self.velocity =
            (self.velocity + steering.linear * dt).clamp_length_max(self.config.max_speed);
        self.position += self.velocity * dt;

        if !is_last && self.position.distance(target) <= self.config.corner_radius {
            self.next_corner += 1;
        }
    }
}

impl Mover for RouteFollower {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_on_surface(&self) -> bool {
        self.on_surface
    }

    fn stopping_distance(&self) -> f32 {
        self.config.stopping_distance
    }

    fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
        if suspended {
            self.velocity = Vec3::ZERO;
        }
    }

    fn follow(&mut self, route: &Route) {
        if self.route_id == Some(route.id) {
            return;
        }
        self.route_id = Some(route.id);
        self.corners.clone_from(&route.corners);
        // First corner is where the route was requested from
        self.next_corner = usize::from(self.corners.len() > 1);
    }
}
