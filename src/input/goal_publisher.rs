//! Pointer-driven goal placement
//!
//! Turns a pointer action into a world-space goal: the pointer ray is cast
//! into the physics world and the single goal marker is moved to the hit
//! point, or spawned there if it does not exist yet.

use glam::Vec3;
use hecs::Entity;

use crate::core::{EventQueue, GOAL_TAG, NavEvent};
use crate::ecs::World;
use crate::physics::Physics;

/// How far a pointer ray is allowed to travel
const MAX_POINTER_DISTANCE: f32 = 500.0;

/// A ray from the camera through the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PointerRay {
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// A ray pointing straight down onto `target` from `height` above it
    #[must_use]
    pub fn looking_down_at(target: Vec3, height: f32) -> Self {
        Self::new(target + Vec3::Y * height, Vec3::NEG_Y)
    }
}

/// Owns the goal marker and keeps it unique.
#[derive(Debug, Clone)]
pub struct GoalPublisher {
    tag: String,
    marker: Option<Entity>,
}

impl GoalPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_tag(GOAL_TAG)
    }

    /// Publish markers carrying a custom tag
    #[must_use]
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            marker: None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The marker placed last, if any
    #[must_use]
    pub fn marker(&self) -> Option<Entity> {
        self.marker
    }

    /// Resolve a pointer action against the physics world and place the goal
    /// at the hit point. Returns `None` when the ray hits nothing.
    pub fn on_pointer(
        &mut self,
        world: &mut World,
        physics: &Physics,
        ray: PointerRay,
        events: &mut EventQueue,
    ) -> Option<Entity> {
        if ray.direction == Vec3::ZERO {
            return None;
        }
        let Some(hit) = physics.raycast(ray.origin, ray.direction, MAX_POINTER_DISTANCE) else {
            log::debug!("Pointer ray from {} hit nothing", ray.origin);
            return None;
        };
        Some(self.place(world, hit.point, events))
    }

    /// Place the goal at `point`, reusing the marker if it is still alive
    pub fn place(&mut self, world: &mut World, point: Vec3, events: &mut EventQueue) -> Entity {
        let goal = match self.marker {
            Some(marker) if world.set_position(marker, point) => marker,
            _ => {
                let marker = world.spawn_tagged("Goal", &self.tag, point);
                self.marker = Some(marker);
                marker
            }
        };

        log::info!("Goal placed at {point}");
        events.push(NavEvent::GoalPlaced {
            goal,
            position: point,
        });
        goal
    }
}

impl Default for GoalPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;
    use crate::ai::SceneQuery;

    #[test]
    fn test_place_reuses_marker() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut publisher = GoalPublisher::new();

        let first = publisher.place(&mut world, Vec3::new(1.0, 0.0, 1.0), &mut events);
        let second = publisher.place(&mut world, Vec3::new(4.0, 0.0, -2.0), &mut events);

        assert_eq!(first, second);
        assert_eq!(world.tagged(GOAL_TAG).len(), 1);
        assert_eq!(world.position_of(first), Some(Vec3::new(4.0, 0.0, -2.0)));
        assert_eq!(events.pending_count(), 2);
    }

    #[test]
    fn test_place_after_marker_destroyed() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut publisher = GoalPublisher::new();

        let first = publisher.place(&mut world, Vec3::X, &mut events);
        world.destroy(first);

        let second = publisher.place(&mut world, Vec3::Z, &mut events);

        assert_ne!(first, second);
        assert_eq!(publisher.marker(), Some(second));
        assert_eq!(world.tagged(GOAL_TAG), vec![second]);
    }

    #[test]
    fn test_many_clicks_single_goal() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut publisher = GoalPublisher::new();

        for i in 0..20 {
            let point = Vec3::new(i as f32, 0.0, (i % 3) as f32);
            let goal = publisher.place(&mut world, point, &mut events);
            if i % 5 == 4 {
                world.destroy(goal);
            }
            assert!(world.tagged(GOAL_TAG).len() <= 1);
        }
    }

    #[test]
    fn test_on_pointer_hits_ground() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut physics = Physics::new();
        let ground = physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
        physics.add_ground_plane(ground);
        physics.step(1.0 / 60.0);

        let mut publisher = GoalPublisher::with_tag("Flag");
        let ray = PointerRay::looking_down_at(Vec3::new(3.0, 0.0, 2.0), 10.0);
        let goal = publisher
            .on_pointer(&mut world, &physics, ray, &mut events)
            .expect("goal");

        let position = world.position_of(goal).expect("position");
        assert!((position - Vec3::new(3.0, 0.1, 2.0)).length() < 1e-3);
        assert!(world.has_tag(goal, "Flag"));
    }

    #[test]
    fn test_on_pointer_miss() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let physics = Physics::new();
        let mut publisher = GoalPublisher::new();

        let ray = PointerRay::new(Vec3::Y, Vec3::Y);
        assert_eq!(publisher.on_pointer(&mut world, &physics, ray, &mut events), None);
        assert!(world.is_empty());
        assert_eq!(events.pending_count(), 0);
    }
}
