//! A* pathfinding on a 2D grid
//!
//! Grid-based navigation on the XZ plane, plus a `Pathfinder` backed by it
//! that can simulate computation latency.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::ai::{Pathfinder, Route};

/// A 2D navigation grid
#[derive(Debug, Clone)]
pub struct Grid {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    /// Cell size in world units
    pub cell_size: f32,
    /// Walkable cells (true = walkable)
    cells: Vec<bool>,
    /// World origin offset
    pub origin: Vec2,
}

impl Grid {
    /// Create a new grid (all cells walkable by default)
    #[must_use]
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            cells: vec![true; width * height],
            origin: Vec2::ZERO,
        }
    }

    /// Set the world position of the grid's corner
    #[must_use]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Set a cell's walkability
    pub fn set_walkable(&mut self, x: usize, y: usize, walkable: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = walkable;
        }
    }

    /// Check if a cell is walkable
    #[must_use]
    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[y * self.width + x]
    }

    /// Check if a world position lies inside the grid bounds
    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        let (x, y) = self.world_to_grid(pos);
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Mark every cell overlapping the rectangle as unwalkable.
    ///
    /// Returns the number of cells that changed.
    pub fn block_region(&mut self, center: Vec2, half_extents: Vec2) -> usize {
        let (min_x, min_y) = self.world_to_grid(center - half_extents);
        let (max_x, max_y) = self.world_to_grid(center + half_extents);

        let mut changed = 0;
        for y in min_y.max(0)..=max_y {
            for x in min_x.max(0)..=max_x {
                let (x, y) = (x as usize, y as usize);
                if self.is_walkable(x, y) {
                    self.set_walkable(x, y, false);
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Convert world position to grid coordinates
    #[must_use]
    pub fn world_to_grid(&self, pos: Vec2) -> (i32, i32) {
        let local = pos - self.origin;
        (
            (local.x / self.cell_size).floor() as i32,
            (local.y / self.cell_size).floor() as i32,
        )
    }

    /// Convert grid coordinates to world position (center of cell)
    #[must_use]
    pub fn grid_to_world(&self, x: usize, y: usize) -> Vec2 {
        self.origin
            + Vec2::new(
                (x as f32 + 0.5) * self.cell_size,
                (y as f32 + 0.5) * self.cell_size,
            )
    }

    /// Get neighbors of a cell (4-directional)
    fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);

        if x > 0 && self.is_walkable(x - 1, y) {
            result.push((x - 1, y));
        }
        if x + 1 < self.width && self.is_walkable(x + 1, y) {
            result.push((x + 1, y));
        }
        if y > 0 && self.is_walkable(x, y - 1) {
            result.push((x, y - 1));
        }
        if y + 1 < self.height && self.is_walkable(x, y + 1) {
            result.push((x, y + 1));
        }

        result
    }
}

/// Result of pathfinding
#[derive(Debug, Clone, Default)]
pub struct PathResult {
    /// Waypoints in world coordinates
    pub waypoints: Vec<Vec2>,
    /// Total path length
    pub length: f32,
}

impl PathResult {
    /// Check if path was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// A* node for priority queue
#[derive(Debug, Clone)]
struct Node {
    x: usize,
    y: usize,
    f_cost: f32, // g_cost + heuristic
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn in_bounds(grid: &Grid, (x, y): (i32, i32)) -> Option<(usize, usize)> {
    if x < 0 || y < 0 || x as usize >= grid.width || y as usize >= grid.height {
        return None;
    }
    Some((x as usize, y as usize))
}

/// Find a path using A* algorithm.
///
/// The start cell may be blocked (an agent standing in a freshly carved
/// obstacle must still be able to walk out); the goal cell must be walkable.
#[must_use]
pub fn find_path(grid: &Grid, start: Vec2, goal: Vec2) -> PathResult {
    let (Some((start_x, start_y)), Some((goal_x, goal_y))) = (
        in_bounds(grid, grid.world_to_grid(start)),
        in_bounds(grid, grid.world_to_grid(goal)),
    ) else {
        return PathResult::default();
    };

    if !grid.is_walkable(goal_x, goal_y) {
        return PathResult::default();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: FxHashMap<(usize, usize), (usize, usize)> = FxHashMap::default();
    let mut g_score: FxHashMap<(usize, usize), f32> = FxHashMap::default();

    let heuristic = |x: usize, y: usize| -> f32 {
        let dx = (x as f32 - goal_x as f32).abs();
        let dy = (y as f32 - goal_y as f32).abs();
        dx + dy // Manhattan distance
    };

    g_score.insert((start_x, start_y), 0.0);
    open_set.push(Node {
        x: start_x,
        y: start_y,
        f_cost: heuristic(start_x, start_y),
    });

    while let Some(current) = open_set.pop() {
        if current.x == goal_x && current.y == goal_y {
            let mut path = vec![(goal_x, goal_y)];
            let mut curr = (goal_x, goal_y);

            while let Some(&prev) = came_from.get(&curr) {
                path.push(prev);
                curr = prev;
            }

            path.reverse();

            let waypoints: Vec<Vec2> = path
                .iter()
                .map(|&(x, y)| grid.grid_to_world(x, y))
                .collect();

            let length = calculate_path_length(&waypoints);

            return PathResult { waypoints, length };
        }

        let current_g = g_score
            .get(&(current.x, current.y))
            .copied()
            .unwrap_or(f32::MAX);

        for (nx, ny) in grid.neighbors(current.x, current.y) {
            let tentative_g = current_g + 1.0;

            if tentative_g < *g_score.get(&(nx, ny)).unwrap_or(&f32::MAX) {
                came_from.insert((nx, ny), (current.x, current.y));
                g_score.insert((nx, ny), tentative_g);

                open_set.push(Node {
                    x: nx,
                    y: ny,
                    f_cost: tentative_g + heuristic(nx, ny),
                });
            }
        }
    }

    // No path found
    PathResult::default()
}

/// Calculate total path length
fn calculate_path_length(waypoints: &[Vec2]) -> f32 {
    waypoints.windows(2).map(|w| w[0].distance(w[1])).sum()
}

// ============================================================================
// Grid Pathfinder
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    start: Vec3,
    goal: Vec3,
    ticks_left: u32,
}

/// `Pathfinder` backed by grid A*.
///
/// Routes are planar at the height of the requested start: the first corner
/// is the start itself, the last is the goal moved to that height, and the
/// corners in between are the centres of the cells crossed. With a latency
/// of N ticks a request stays pending until `step()` has run N times.
#[derive(Debug, Clone)]
pub struct GridPathfinder {
    grid: Grid,
    latency: u32,
    pending: Option<PendingRequest>,
    route: Option<Route>,
    next_id: u64,
}

impl GridPathfinder {
    /// Create a pathfinder that resolves requests immediately
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            latency: 0,
            pending: None,
            route: None,
            next_id: 0,
        }
    }

    /// Keep requests pending for `ticks` calls to `step()`
    #[must_use]
    pub fn with_latency(mut self, ticks: u32) -> Self {
        self.latency = ticks;
        self
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid, e.g. to carve obstacles
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Advance pending work by one tick
    pub fn step(&mut self) {
        let Some(request) = self.pending.as_mut() else {
            return;
        };
        request.ticks_left = request.ticks_left.saturating_sub(1);
        if request.ticks_left == 0 {
            let request = *request;
            self.pending = None;
            self.resolve(request.start, request.goal);
        }
    }

    fn resolve(&mut self, start: Vec3, goal: Vec3) {
        let path = find_path(&self.grid, Vec2::new(start.x, start.z), Vec2::new(goal.x, goal.z));
        if path.is_empty() {
            log::debug!("No route from {start} to {goal}");
            self.route = None;
            return;
        }

        let height = start.y;
        let last = path.waypoints.len() - 1;
        let mut corners = Vec::with_capacity(path.waypoints.len() + 1);
        corners.push(start);
        // A single-cell path has no interior corners
        corners.extend(
            path.waypoints
                .get(1..last)
                .unwrap_or_default()
                .iter()
                .map(|p| Vec3::new(p.x, height, p.y)),
        );
        corners.push(Vec3::new(goal.x, height, goal.z));

        self.next_id += 1;
        let route = Route::new(self.next_id, corners);
        log::trace!(
            "Route {} resolved with {} corners, {:.2} long",
            route.id,
            route.corners.len(),
            route.length()
        );
        self.route = Some(route);
    }
}

impl Pathfinder for GridPathfinder {
    fn request_route(&mut self, start: Vec3, goal: Vec3) {
        if self.latency == 0 {
            self.resolve(start, goal);
        } else {
            self.pending = Some(PendingRequest {
                start,
                goal,
                ticks_left: self.latency,
            });
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    fn reset(&mut self) {
        self.pending = None;
        self.route = None;
    }
}
