//! Routes and the collaborator seams of the navigation agent
//!
//! The agent never plans, steers, draws or looks up entities itself. It talks
//! to the outside world through the traits in this module.

use glam::Vec3;
use hecs::Entity;

/// An ordered sequence of corners from a start point to a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Revision assigned by the pathfinder; changes whenever a new route resolves
    pub id: u64,
    /// Corners in travel order
    pub corners: Vec<Vec3>,
}

impl Route {
    /// Create a route
    #[must_use]
    pub fn new(id: u64, corners: Vec<Vec3>) -> Self {
        Self { id, corners }
    }

    /// Check if the route has no corners
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Total length along the corners
    #[must_use]
    pub fn length(&self) -> f32 {
        self.corners.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Distance left to travel from `position`.
    ///
    /// The position is projected onto the closest segment of the route; the
    /// result is the distance from that projection to the segment's end plus
    /// the length of every later segment.
    #[must_use]
    pub fn remaining_distance(&self, position: Vec3) -> f32 {
        match self.corners.as_slice() {
            [] => 0.0,
            [only] => position.distance(*only),
            corners => {
                let mut best_segment = 0;
                let mut best_point = corners[0];
                let mut best_distance = f32::MAX;

                for (i, segment) in corners.windows(2).enumerate() {
                    let point = closest_point_on_segment(position, segment[0], segment[1]);
                    let distance = position.distance_squared(point);
                    if distance < best_distance {
                        best_distance = distance;
                        best_segment = i;
                        best_point = point;
                    }
                }

                let rest: f32 = corners[best_segment + 1..]
                    .windows(2)
                    .map(|w| w[0].distance(w[1]))
                    .sum();

                best_point.distance(corners[best_segment + 1]) + rest
            }
        }
    }
}

fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Computes routes between two points on the navigable surface.
///
/// Requests are fire-and-forget: the result may stay pending for a while,
/// during which `route()` keeps returning the previously resolved route.
pub trait Pathfinder {
    /// Ask for a route from `start` to `goal`
    fn request_route(&mut self, start: Vec3, goal: Vec3);

    /// True while a requested route has not resolved yet
    fn is_pending(&self) -> bool;

    /// Latest resolved route, if any
    fn route(&self) -> Option<&Route>;

    /// Drop the current route and any pending request
    fn reset(&mut self);
}

/// Moves the agent along the route it is given.
pub trait Mover {
    /// Current agent position
    fn position(&self) -> Vec3;

    /// Whether the agent currently stands on the navigable surface
    fn is_on_surface(&self) -> bool;

    /// Distance to the goal at which the agent counts as arrived
    fn stopping_distance(&self) -> f32;

    /// Hold position (`true`) or keep moving along the route (`false`)
    fn set_suspended(&mut self, suspended: bool);

    /// Follow `route`; called every tick with the latest route
    fn follow(&mut self, route: &Route);
}

/// Displays a polyline.
pub trait RouteRenderer {
    /// Show the points as a connected line; an empty slice clears the display
    fn draw_polyline(&mut self, points: &[Vec3]);
}

/// Finds entities by tag and reads their position.
pub trait SceneQuery {
    /// First entity carrying `tag`
    fn find_by_tag(&self, tag: &str) -> Option<Entity>;

    /// Whether `entity` exists and carries `tag`
    fn has_tag(&self, entity: Entity, tag: &str) -> bool;

    /// World position of `entity`, `None` once it is gone
    fn position_of(&self, entity: Entity) -> Option<Vec3>;

    /// Remove `entity` from the scene
    fn destroy(&mut self, entity: Entity);
}
