//! Goal-Seeking Navigation Agent
//!
//! The agent finds a tagged goal, asks the pathfinder for a route on a fixed
//! cadence, hands the route to the mover and the renderer, and consumes the
//! goal once it gets close enough. Touching an obstacle suspends movement,
//! forces an immediate recompute, and resumes after a short delay.
//!
//! # Tick order
//!
//! Every `update()` runs the same steps in the same order:
//!
//! 1. Deferred tasks that became due (the post-contact resume)
//! 2. Surface check – off the surface, nothing else happens this tick
//! 3. Goal validation – a goal that vanished sends the agent back to `Idle`
//! 4. Goal discovery (from `Idle`) or periodic replanning (otherwise)
//! 5. Route display and hand-off to the mover
//! 6. Arrival check (from `Seeking`)
//!
//! Obstacle contacts arrive through `on_contact()` between ticks.
//!
//! # Example
//!
//! ```ignore
//! let mut agent = NavigationAgent::new(NavConfig::default());
//!
//! let mut ctx = NavContext {
//!     scene: &mut world,
//!     pathfinder: &mut pathfinder,
//!     mover: &mut follower,
//!     renderer: &mut line,
//!     events: &mut events,
//!     delta_time: dt,
//! };
//!
//! for (other, _) in contacts {
//!     agent.on_contact(other, &mut ctx);
//! }
//! agent.update(&mut ctx);
//! ```

use glam::Vec3;
use hecs::Entity;

use crate::ai::{Mover, NavState, Pathfinder, RouteRenderer, SceneQuery};
use crate::core::{
    EventQueue, NavConfig, NavEvent, Scheduler, TIMER_EPSILON, TaskHandle,
};

/// Everything the agent talks to during a tick.
pub struct NavContext<'a> {
    /// Tag lookup and goal positions
    pub scene: &'a mut dyn SceneQuery,
    /// Route computation
    pub pathfinder: &'a mut dyn Pathfinder,
    /// Locomotion along the route
    pub mover: &'a mut dyn Mover,
    /// Route display
    pub renderer: &'a mut dyn RouteRenderer,
    /// Outgoing navigation events
    pub events: &'a mut EventQueue,
    /// Seconds covered by this tick
    pub delta_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgentTask {
    Resume,
}

/// Path acquisition and path following for a single agent.
#[derive(Debug)]
pub struct NavigationAgent {
    config: NavConfig,
    state: NavState,
    /// Holding position instead of advancing along the route
    suspended: bool,
    /// Seconds since the last route request
    replan_timer: f32,
    goal: Option<Entity>,
    scheduler: Scheduler<AgentTask>,
    resume_task: Option<TaskHandle>,
    /// Set while the surface check fails, so the warning is logged once
    off_surface: bool,
    /// Reused polyline buffer: agent position followed by the route corners
    polyline: Vec<Vec3>,
    displayed_len: usize,
}

impl NavigationAgent {
    /// Create an idle, suspended agent.
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            state: NavState::Idle,
            suspended: true,
            replan_timer: 0.0,
            goal: None,
            scheduler: Scheduler::new(),
            resume_task: None,
            off_surface: false,
            polyline: Vec::new(),
            displayed_len: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> NavState {
        self.state
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// The goal currently bound, if any.
    #[must_use]
    pub fn goal(&self) -> Option<Entity> {
        self.goal
    }

    /// Seconds since the last route request.
    #[must_use]
    pub fn replan_timer(&self) -> f32 {
        self.replan_timer
    }

    /// Number of points in the displayed polyline.
    #[must_use]
    pub fn displayed_route_len(&self) -> usize {
        self.displayed_len
    }

    /// Run one simulation tick.
    pub fn update(&mut self, ctx: &mut NavContext<'_>) {
        for task in self.scheduler.advance(ctx.delta_time) {
            match task {
                AgentTask::Resume => self.resume(ctx),
            }
        }

        if !ctx.mover.is_on_surface() {
            if !self.off_surface {
                let position = ctx.mover.position();
                log::warn!("Agent at {position} is not on the navigable surface");
                ctx.events.push(NavEvent::SurfaceLost { position });
                self.off_surface = true;
            }
            return;
        }
        if self.off_surface {
            log::info!("Agent is back on the navigable surface");
            self.off_surface = false;
        }

        self.validate_goal(ctx);

        if self.state == NavState::Idle {
            if !self.discover_goal(ctx) {
                return;
            }
        } else {
            self.tick_replan(ctx);
        }

        self.display_route(ctx);

        if self.state == NavState::Seeking {
            self.check_arrival(ctx);
        }
    }

    /// Handle a physical contact with `other`.
    ///
    /// Only entities tagged as obstacles matter, and only while a goal is
    /// held. The agent suspends at once, requests a fresh route, and resumes
    /// `reroute_resume_delay` seconds after the latest contact.
    pub fn on_contact(&mut self, other: Entity, ctx: &mut NavContext<'_>) {
        if !self.state.has_goal() || !ctx.scene.has_tag(other, &self.config.obstacle_tag) {
            return;
        }

        log::info!("Contact with obstacle {other:?}, rerouting");
        ctx.events.push(NavEvent::ObstacleContact { obstacle: other });

        self.set_suspended(true, ctx);
        self.recompute(ctx, true);
        self.transition(NavState::Rerouting, ctx);

        if let Some(handle) = self.resume_task.take() {
            self.scheduler.cancel(handle);
        }
        self.resume_task = Some(
            self.scheduler
                .schedule(self.config.reroute_resume_delay, AgentTask::Resume),
        );
    }

    fn resume(&mut self, ctx: &mut NavContext<'_>) {
        self.resume_task = None;

        // Goal may have been consumed or lost while waiting
        if self.state != NavState::Rerouting {
            log::trace!("Resume ignored in state {}", self.state);
            return;
        }

        self.set_suspended(false, ctx);
        self.transition(NavState::Seeking, ctx);
        ctx.events.push(NavEvent::Resumed);
    }

    fn validate_goal(&mut self, ctx: &mut NavContext<'_>) {
        let Some(goal) = self.goal else {
            return;
        };
        if ctx.scene.position_of(goal).is_none() {
            log::info!("Goal {goal:?} disappeared, returning to idle");
            self.release_goal(ctx);
        }
    }

    fn discover_goal(&mut self, ctx: &mut NavContext<'_>) -> bool {
        let found = ctx
            .scene
            .find_by_tag(&self.config.goal_tag)
            .and_then(|goal| ctx.scene.position_of(goal).map(|position| (goal, position)));

        let Some((goal, position)) = found else {
            self.clear_display(ctx);
            return false;
        };

        log::info!("Bound goal {goal:?} at {position}");
        self.goal = Some(goal);
        ctx.events.push(NavEvent::GoalBound { goal, position });

        self.set_suspended(false, ctx);
        self.transition(NavState::Seeking, ctx);
        self.recompute(ctx, false);
        true
    }

    fn tick_replan(&mut self, ctx: &mut NavContext<'_>) {
        self.replan_timer += ctx.delta_time;

        // No periodic requests while held by an obstacle contact
        let due = self.replan_timer + TIMER_EPSILON >= self.config.path_update_interval;
        if self.state == NavState::Seeking && due {
            self.recompute(ctx, false);
        }
    }

    fn recompute(&mut self, ctx: &mut NavContext<'_>, forced: bool) {
        self.replan_timer = 0.0;

        let Some(goal) = self.goal.and_then(|goal| ctx.scene.position_of(goal)) else {
            return;
        };
        let start = ctx.mover.position();

        log::debug!("Requesting route {start} -> {goal} (forced: {forced})");
        ctx.pathfinder.request_route(start, goal);
        ctx.events.push(NavEvent::RouteRequested {
            start,
            goal,
            forced,
        });
    }

    fn display_route(&mut self, ctx: &mut NavContext<'_>) {
        let has_route = ctx.pathfinder.route().is_some_and(|route| !route.is_empty());
        if !has_route {
            self.clear_display(ctx);
            return;
        }

        if let Some(route) = ctx.pathfinder.route() {
            self.polyline.clear();
            self.polyline.push(ctx.mover.position());
            self.polyline.extend_from_slice(&route.corners);

            ctx.renderer.draw_polyline(&self.polyline);
            self.displayed_len = self.polyline.len();
            ctx.mover.follow(route);
        }
    }

    fn check_arrival(&mut self, ctx: &mut NavContext<'_>) {
        if ctx.pathfinder.is_pending() {
            return;
        }

        let position = ctx.mover.position();
        let remaining = ctx
            .pathfinder
            .route()
            .filter(|route| !route.is_empty())
            .map(|route| route.remaining_distance(position));

        let (Some(remaining), Some(goal)) = (remaining, self.goal) else {
            return;
        };
        if remaining > ctx.mover.stopping_distance() {
            return;
        }

        log::info!("Reached goal {goal:?} at {position}");
        self.transition(NavState::Arrived, ctx);
        ctx.scene.destroy(goal);
        ctx.events.push(NavEvent::GoalReached { goal, position });
        self.release_goal(ctx);
    }

    /// Unbind the goal and fall back to `Idle`: suspended, nothing displayed,
    /// no route kept.
    fn release_goal(&mut self, ctx: &mut NavContext<'_>) {
        self.goal = None;
        self.set_suspended(true, ctx);
        self.clear_display(ctx);
        ctx.pathfinder.reset();

        // The resume is the only deferred task
        self.scheduler.clear();
        self.resume_task = None;

        self.transition(NavState::Idle, ctx);
    }

    fn set_suspended(&mut self, suspended: bool, ctx: &mut NavContext<'_>) {
        self.suspended = suspended;
        ctx.mover.set_suspended(suspended);
    }

    fn clear_display(&mut self, ctx: &mut NavContext<'_>) {
        if self.displayed_len > 0 {
            ctx.renderer.draw_polyline(&[]);
        }
        self.polyline.clear();
        self.displayed_len = 0;
    }

    fn transition(&mut self, to: NavState, ctx: &mut NavContext<'_>) {
        if self.state == to {
            return;
        }
        let from = self.state;
        log::debug!("Navigation state {from} -> {to}");
        self.state = to;
        ctx.events.push(NavEvent::StateChanged { from, to });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Route;
    use crate::core::{GOAL_TAG, OBSTACLE_TAG};
    use crate::ecs::World;

    #[derive(Debug, Default)]
    struct MockPathfinder {
        requests: Vec<(Vec3, Vec3)>,
        pending: bool,
        /// New requests stay pending instead of resolving
        hold: bool,
        unreachable: bool,
        route: Option<Route>,
        resets: usize,
        next_id: u64,
    }

    impl Pathfinder for MockPathfinder {
        fn request_route(&mut self, start: Vec3, goal: Vec3) {
            self.requests.push((start, goal));
            if self.hold {
                self.pending = true;
                return;
            }
            self.next_id += 1;
            self.route = if self.unreachable {
                None
            } else {
                Some(Route::new(self.next_id, vec![start, goal]))
            };
        }

        fn is_pending(&self) -> bool {
            self.pending
        }

        fn route(&self) -> Option<&Route> {
            self.route.as_ref()
        }

        fn reset(&mut self) {
            self.route = None;
            self.pending = false;
            self.resets += 1;
        }
    }

    #[derive(Debug)]
    struct MockMover {
        position: Vec3,
        on_surface: bool,
        suspended: bool,
        following: Option<u64>,
    }

    impl Mover for MockMover {
        fn position(&self) -> Vec3 {
            self.position
        }

        fn is_on_surface(&self) -> bool {
            self.on_surface
        }

        fn stopping_distance(&self) -> f32 {
            0.5
        }

        fn set_suspended(&mut self, suspended: bool) {
            self.suspended = suspended;
        }

        fn follow(&mut self, route: &Route) {
            self.following = Some(route.id);
        }
    }

    #[derive(Debug, Default)]
    struct MockRenderer {
        points: Vec<Vec3>,
    }

    impl RouteRenderer for MockRenderer {
        fn draw_polyline(&mut self, points: &[Vec3]) {
            self.points = points.to_vec();
        }
    }

    struct Harness {
        world: World,
        pathfinder: MockPathfinder,
        mover: MockMover,
        renderer: MockRenderer,
        events: EventQueue,
        agent: NavigationAgent,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                world: World::new(),
                pathfinder: MockPathfinder::default(),
                mover: MockMover {
                    position: Vec3::ZERO,
                    on_surface: true,
                    suspended: false,
                    following: None,
                },
                renderer: MockRenderer::default(),
                events: EventQueue::new(),
                agent: NavigationAgent::new(NavConfig::default()),
            }
        }

        fn tick(&mut self, dt: f32) {
            let mut ctx = NavContext {
                scene: &mut self.world,
                pathfinder: &mut self.pathfinder,
                mover: &mut self.mover,
                renderer: &mut self.renderer,
                events: &mut self.events,
                delta_time: dt,
            };
            self.agent.update(&mut ctx);
        }

        fn contact(&mut self, other: Entity) {
            let mut ctx = NavContext {
                scene: &mut self.world,
                pathfinder: &mut self.pathfinder,
                mover: &mut self.mover,
                renderer: &mut self.renderer,
                events: &mut self.events,
                delta_time: 0.0,
            };
            self.agent.on_contact(other, &mut ctx);
        }

        fn place_goal(&mut self, position: Vec3) -> Entity {
            self.world.spawn_tagged("Goal", GOAL_TAG, position)
        }

        /// Spawn a goal far away and bind it.
        fn seeking() -> (Self, Entity) {
            let mut harness = Self::new();
            let goal = harness.place_goal(Vec3::new(10.0, 0.0, 0.0));
            harness.tick(0.125);
            assert_eq!(harness.agent.state(), NavState::Seeking);
            (harness, goal)
        }

        fn pending_events(&self) -> Vec<NavEvent> {
            self.events.iter_pending().cloned().collect()
        }
    }

    #[test]
    fn test_idle_without_goal() {
        let mut h = Harness::new();

        h.tick(0.125);
        h.tick(0.125);

        assert_eq!(h.agent.state(), NavState::Idle);
        assert!(h.agent.is_suspended());
        assert_eq!(h.agent.displayed_route_len(), 0);
        assert!(h.pathfinder.requests.is_empty());
    }

    #[test]
    fn test_goal_discovery_binds_and_requests_route() {
        let mut h = Harness::new();
        let goal_pos = Vec3::new(10.0, 0.0, 0.0);
        let goal = h.place_goal(goal_pos);

        h.tick(0.125);

        assert_eq!(h.agent.state(), NavState::Seeking);
        assert_eq!(h.agent.goal(), Some(goal));
        assert!(!h.agent.is_suspended());
        assert!(!h.mover.suspended);
        assert_eq!(h.pathfinder.requests, vec![(Vec3::ZERO, goal_pos)]);

        // Agent position followed by both corners
        assert_eq!(h.agent.displayed_route_len(), 3);
        assert_eq!(h.renderer.points, vec![Vec3::ZERO, Vec3::ZERO, goal_pos]);
        assert_eq!(h.mover.following, Some(1));
        assert!(h.pending_events().contains(&NavEvent::GoalBound {
            goal,
            position: goal_pos
        }));
    }

    #[test]
    fn test_replan_cadence() {
        let (mut h, _) = Harness::seeking();
        assert_eq!(h.pathfinder.requests.len(), 1);

        // 0.375s after binding: not yet
        for _ in 0..3 {
            h.tick(0.125);
        }
        assert_eq!(h.pathfinder.requests.len(), 1);

        // 0.5s after binding
        h.tick(0.125);
        assert_eq!(h.pathfinder.requests.len(), 2);
        assert!(h.agent.replan_timer().abs() < f32::EPSILON);

        for _ in 0..3 {
            h.tick(0.125);
        }
        assert_eq!(h.pathfinder.requests.len(), 2);
        h.tick(0.125);
        assert_eq!(h.pathfinder.requests.len(), 3);
    }

    #[test]
    fn test_arrival_consumes_goal() {
        let (mut h, goal) = Harness::seeking();
        h.mover.position = Vec3::new(9.8, 0.0, 0.0);

        h.tick(0.125);

        assert_eq!(h.agent.state(), NavState::Idle);
        assert_eq!(h.agent.goal(), None);
        assert!(!h.world.contains(goal), "Goal should be destroyed");
        assert!(h.agent.is_suspended());
        assert!(h.mover.suspended);
        assert_eq!(h.agent.displayed_route_len(), 0);
        assert!(h.renderer.points.is_empty());
        assert_eq!(h.pathfinder.resets, 1);

        let events = h.pending_events();
        assert!(events.contains(&NavEvent::StateChanged {
            from: NavState::Seeking,
            to: NavState::Arrived
        }));
        assert!(events.contains(&NavEvent::StateChanged {
            from: NavState::Arrived,
            to: NavState::Idle
        }));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, NavEvent::GoalReached { goal: g, .. } if *g == goal))
        );

        // Stays idle afterwards
        h.tick(0.125);
        assert_eq!(h.agent.state(), NavState::Idle);
        assert_eq!(h.agent.displayed_route_len(), 0);
    }

    #[test]
    fn test_no_arrival_while_pending() {
        let (mut h, goal) = Harness::seeking();
        h.pathfinder.pending = true;
        h.mover.position = Vec3::new(9.9, 0.0, 0.0);

        h.tick(0.125);

        assert_eq!(h.agent.state(), NavState::Seeking);
        assert!(h.world.contains(goal));
        // Previous route is still shown
        assert_eq!(h.agent.displayed_route_len(), 3);
        assert_eq!(h.renderer.points[0], Vec3::new(9.9, 0.0, 0.0));
    }

    #[test]
    fn test_pending_request_keeps_previous_route() {
        let (mut h, _) = Harness::seeking();
        h.pathfinder.hold = true;

        for _ in 0..4 {
            h.tick(0.125);
        }

        assert_eq!(h.pathfinder.requests.len(), 2);
        assert!(h.pathfinder.is_pending());
        assert_eq!(h.mover.following, Some(1));
        assert_eq!(h.agent.displayed_route_len(), 3);
    }

    #[test]
    fn test_unreachable_goal_clears_display() {
        let mut h = Harness::new();
        h.pathfinder.unreachable = true;
        h.place_goal(Vec3::new(10.0, 0.0, 0.0));

        h.tick(0.125);

        assert_eq!(h.agent.state(), NavState::Seeking);
        assert_eq!(h.agent.displayed_route_len(), 0);
        assert_eq!(h.mover.following, None);
    }

    #[test]
    fn test_obstacle_contact_reroutes_and_resumes() {
        let (mut h, _) = Harness::seeking();
        let rock = h.world.spawn_tagged("Rock", OBSTACLE_TAG, Vec3::new(5.0, 0.0, 0.0));
        h.tick(0.25);
        assert!(h.agent.replan_timer() > 0.0);

        h.contact(rock);

        assert!(h.agent.is_suspended());
        assert!(h.mover.suspended);
        assert_eq!(h.agent.state(), NavState::Rerouting);
        assert_eq!(h.pathfinder.requests.len(), 2, "Contact forces a recompute");
        assert!(h.agent.replan_timer().abs() < f32::EPSILON);
        assert!(h.pending_events().iter().any(|e| matches!(
            e,
            NavEvent::RouteRequested { forced: true, .. }
        )));

        h.tick(0.25);
        assert_eq!(h.agent.state(), NavState::Rerouting);
        assert!(h.agent.is_suspended());
        assert_eq!(h.pathfinder.requests.len(), 2, "No requests while held");

        // Exactly the resume delay after contact
        h.tick(0.25);
        assert_eq!(h.agent.state(), NavState::Seeking);
        assert!(!h.agent.is_suspended());
        assert!(!h.mover.suspended);
        // The timer kept counting from the contact reset
        assert_eq!(h.pathfinder.requests.len(), 3);
    }

    #[test]
    fn test_repeated_contact_restarts_resume_delay() {
        let (mut h, _) = Harness::seeking();
        let rock = h.world.spawn_tagged("Rock", OBSTACLE_TAG, Vec3::X);

        h.contact(rock);
        h.tick(0.25);
        h.contact(rock);
        h.tick(0.25);

        // First contact was 0.5s ago but the second one rescheduled the resume
        assert_eq!(h.agent.state(), NavState::Rerouting);

        h.tick(0.25);
        assert_eq!(h.agent.state(), NavState::Seeking);
        assert!(!h.agent.is_suspended());
    }

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_replan_cadence_at_60hz() {
        let mut h = Harness::new();
        h.place_goal(Vec3::new(10.0, 0.0, 0.0));
        h.tick(FRAME);
        assert_eq!(h.pathfinder.requests.len(), 1);

        for interval in 1..=3 {
            for _ in 0..29 {
                h.tick(FRAME);
            }
            assert_eq!(h.pathfinder.requests.len(), interval, "Replanned early");

            h.tick(FRAME);
            assert_eq!(h.pathfinder.requests.len(), interval + 1, "Missed tick 30");
        }
    }

    #[test]
    fn test_resume_on_exact_frame_at_60hz() {
        let (mut h, _) = Harness::seeking();
        let rock = h.world.spawn_tagged("Rock", OBSTACLE_TAG, Vec3::new(5.0, 0.0, 0.0));

        // Let a periodic replan happen first, so the contact lands mid-session
        while h.pathfinder.requests.len() < 2 {
            h.tick(FRAME);
        }
        h.tick(FRAME);
        h.contact(rock);
        assert!(h.agent.is_suspended());
        let requests = h.pathfinder.requests.len();

        for _ in 0..29 {
            h.tick(FRAME);
        }
        assert!(h.agent.is_suspended(), "Resumed before the delay elapsed");
        assert_eq!(h.agent.state(), NavState::Rerouting);

        h.tick(FRAME);
        assert!(!h.agent.is_suspended(), "Resume must land on frame 30");
        assert!(!h.mover.suspended);
        assert_eq!(h.agent.state(), NavState::Seeking);
        // The replan timer ran through the hold, so the periodic request fires too
        assert_eq!(h.pathfinder.requests.len(), requests + 1);
    }

    #[test]
    fn test_contact_ignored_when_idle_or_not_obstacle() {
        let mut h = Harness::new();
        let rock = h.world.spawn_tagged("Rock", OBSTACLE_TAG, Vec3::X);

        h.contact(rock);
        assert_eq!(h.agent.state(), NavState::Idle);
        assert!(h.pathfinder.requests.is_empty());

        let goal = h.place_goal(Vec3::new(10.0, 0.0, 0.0));
        h.tick(0.125);
        h.contact(goal);
        assert_eq!(h.agent.state(), NavState::Seeking);
        assert!(!h.agent.is_suspended());
    }

    #[test]
    fn test_off_surface_skips_tick_and_warns_once() {
        let mut h = Harness::new();
        h.place_goal(Vec3::new(10.0, 0.0, 0.0));
        h.mover.on_surface = false;

        h.tick(0.125);
        h.tick(0.125);

        assert_eq!(h.agent.state(), NavState::Idle);
        let lost = h
            .pending_events()
            .iter()
            .filter(|e| matches!(e, NavEvent::SurfaceLost { .. }))
            .count();
        assert_eq!(lost, 1);

        h.mover.on_surface = true;
        h.tick(0.125);
        assert_eq!(h.agent.state(), NavState::Seeking);
    }

    #[test]
    fn test_resume_fires_while_off_surface() {
        let (mut h, _) = Harness::seeking();
        let rock = h.world.spawn_tagged("Rock", OBSTACLE_TAG, Vec3::X);

        h.contact(rock);
        h.mover.on_surface = false;
        h.tick(0.25);
        h.tick(0.25);

        assert_eq!(h.agent.state(), NavState::Seeking);
        assert!(!h.agent.is_suspended());
        assert_eq!(h.pathfinder.requests.len(), 2, "No replanning off the surface");
    }

    #[test]
    fn test_moved_goal_is_retargeted() {
        let (mut h, goal) = Harness::seeking();
        let moved = Vec3::new(-4.0, 0.0, 6.0);
        h.world.set_position(goal, moved);

        for _ in 0..4 {
            h.tick(0.125);
        }

        assert_eq!(h.pathfinder.requests.last(), Some(&(Vec3::ZERO, moved)));
        assert_eq!(h.agent.goal(), Some(goal));
    }

    #[test]
    fn test_vanished_goal_returns_to_idle() {
        let (mut h, goal) = Harness::seeking();
        let rock = h.world.spawn_tagged("Rock", OBSTACLE_TAG, Vec3::X);
        h.contact(rock);

        h.world.destroy(goal);
        h.tick(0.25);

        assert_eq!(h.agent.state(), NavState::Idle);
        assert!(h.agent.is_suspended());
        assert_eq!(h.agent.displayed_route_len(), 0);

        // The pending resume must not wake an idle agent
        h.tick(0.25);
        h.tick(0.25);
        assert_eq!(h.agent.state(), NavState::Idle);
        assert!(h.agent.is_suspended());
        assert!(h.mover.suspended);
    }

    #[test]
    fn test_new_goal_after_arrival() {
        let (mut h, first) = Harness::seeking();
        h.mover.position = Vec3::new(9.8, 0.0, 0.0);
        h.tick(0.125);
        assert!(!h.world.contains(first));

        let second = h.place_goal(Vec3::new(9.8, 0.0, 8.0));
        h.tick(0.125);

        assert_eq!(h.agent.state(), NavState::Seeking);
        assert_eq!(h.agent.goal(), Some(second));
        assert!(h.world.contains(second), "Fresh goal must not be consumed at once");
    }

    #[test]
    fn test_walks_to_goal_with_grid_pathfinder() {
        use crate::ai::{Grid, GridPathfinder, RouteFollower};
        use crate::core::FollowerConfig;
        use crate::renderer::LineRenderer;

        let mut world = World::new();
        let mut pathfinder = GridPathfinder::new(Grid::new(10, 3, 1.0)).with_latency(1);
        let mut follower = RouteFollower::new(FollowerConfig::default(), Vec3::new(0.5, 0.5, 1.5));
        let mut line = LineRenderer::new();
        let mut events = EventQueue::new();
        let mut agent = NavigationAgent::new(NavConfig::default());

        let goal = world.spawn_tagged("Goal", GOAL_TAG, Vec3::new(8.5, 0.0, 1.5));
        let dt = 1.0 / 60.0;

        for _ in 0..1200 {
            pathfinder.step();
            let mut ctx = NavContext {
                scene: &mut world,
                pathfinder: &mut pathfinder,
                mover: &mut follower,
                renderer: &mut line,
                events: &mut events,
                delta_time: dt,
            };
            agent.update(&mut ctx);
            follower.advance(dt);
            events.swap();

            if !world.contains(goal) {
                break;
            }
        }

        assert!(!world.contains(goal));
        assert_eq!(agent.state(), NavState::Idle);
        assert_eq!(line.position_count(), 0);
        assert!(follower.position().distance(Vec3::new(8.5, 0.5, 1.5)) <= 0.5 + 1e-3);
    }
}
