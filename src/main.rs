//! Headless demo: an agent walks to clicked goals, rerouting around
//! obstacles it bumps into.
//!
//! Usage: `waypoint [scenario.ron | scenario.json]`

use glam::Vec3Swizzles;
use hecs::Entity;
use waypoint::core::SceneError;
use waypoint::prelude::*;

/// Height above the target the scripted pointer ray starts from
const POINTER_HEIGHT: f32 = 20.0;

/// Simulated seconds before the demo gives up
const MAX_SECONDS: u64 = 60;

struct ObstacleInfo {
    entity: Entity,
    position: Vec3,
    half_extents: Vec3,
}

/// Demo game driving one navigation agent through a scenario
struct DemoGame {
    scenario: Scenario,
    agent: NavigationAgent,
    pathfinder: GridPathfinder,
    follower: RouteFollower,
    line: LineRenderer,
    publisher: GoalPublisher,
    agent_entity: Option<Entity>,
    agent_body: Option<RigidBodyHandle>,
    obstacles: Vec<ObstacleInfo>,
    goals_reached: u32,
    reroutes: u32,
}

impl DemoGame {
    fn new(scenario: Scenario) -> Self {
        let pathfinder =
            GridPathfinder::new(scenario.build_grid()).with_latency(scenario.pathfinder_latency);
        let follower = RouteFollower::new(scenario.follower.clone(), scenario.agent_start);
        let publisher = GoalPublisher::with_tag(scenario.nav.goal_tag.clone());
        let agent = NavigationAgent::new(scenario.nav.clone());

        Self {
            scenario,
            agent,
            pathfinder,
            follower,
            line: LineRenderer::new(),
            publisher,
            agent_entity: None,
            agent_body: None,
            obstacles: Vec::new(),
            goals_reached: 0,
            reroutes: 0,
        }
    }

    fn replay_clicks(&mut self, ctx: &mut EngineContext) {
        let frame = ctx.time.frame_count();
        for click in self.scenario.clicks.iter().filter(|c| c.frame == frame) {
            let ray = PointerRay::looking_down_at(click.target, POINTER_HEIGHT);
            if self
                .publisher
                .on_pointer(&mut ctx.world, &ctx.physics, ray, &mut ctx.events)
                .is_none()
            {
                log::warn!("Click at {} missed the scene", click.target);
            }
        }
    }

    /// Forward this frame's contacts to the agent. An obstacle the planner
    /// did not know about is carved into the grid first, so the forced
    /// recompute already avoids it.
    fn forward_contacts(&mut self, ctx: &mut EngineContext) {
        let Some(agent_entity) = self.agent_entity else {
            return;
        };

        for contact in ctx.physics.drain_contacts() {
            let Some(other) = contact.other(agent_entity) else {
                continue;
            };

            if let Some(obstacle) = self.obstacles.iter().find(|o| o.entity == other) {
                let carved = self
                    .pathfinder
                    .grid_mut()
                    .block_region(obstacle.position.xz(), obstacle.half_extents.xz());
                if carved > 0 {
                    log::debug!("Carved {carved} cells for obstacle {other:?}");
                }
            }

            let before = self.agent.state();
            let mut nav = NavContext {
                scene: &mut ctx.world,
                pathfinder: &mut self.pathfinder,
                mover: &mut self.follower,
                renderer: &mut self.line,
                events: &mut ctx.events,
                delta_time: ctx.time.delta_seconds(),
            };
            self.agent.on_contact(other, &mut nav);
            if before != NavState::Rerouting && self.agent.state() == NavState::Rerouting {
                self.reroutes += 1;
            }
        }
    }

    fn log_events(&mut self, ctx: &EngineContext) {
        for event in ctx.events.iter() {
            match event {
                NavEvent::GoalReached { position, .. } => {
                    self.goals_reached += 1;
                    log::info!(
                        "[{:.2}s] Goal reached at {position}",
                        ctx.time.elapsed_seconds()
                    );
                }
                other => log::debug!("[{:.2}s] {other:?}", ctx.time.elapsed_seconds()),
            }
        }
    }

    fn finished(&self, frame: u64) -> bool {
        let clicks_done = self
            .scenario
            .last_click_frame()
            .is_none_or(|last| frame > last);
        clicks_done && self.agent.state() == NavState::Idle
    }
}

impl Game for DemoGame {
    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!("Initializing scenario '{}'", self.scenario.name);

        // Ground
        let ground = ctx.world.spawn((Name::new("Ground"), Transform::default()));
        let ground_body = ctx.physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
        let ground_collider = ctx.physics.add_ground_plane(ground_body);
        ctx.physics.attach_entity(ground_collider, ground);

        // Obstacles
        for layout in &self.scenario.obstacles {
            let entity = ctx.world.spawn_tagged(
                &layout.name,
                &self.scenario.nav.obstacle_tag,
                layout.position,
            );
            let body = ctx
                .physics
                .create_static_body(layout.position, Quat::IDENTITY);
            let collider = ctx.physics.add_box_collider(body, layout.half_extents);
            ctx.physics.attach_entity(collider, entity);

            self.obstacles.push(ObstacleInfo {
                entity,
                position: layout.position,
                half_extents: layout.half_extents,
            });
        }

        // Agent
        let start = self.scenario.agent_start;
        let agent = ctx
            .world
            .spawn((Name::new("Agent"), Transform::from_position(start)));
        let body = ctx.physics.create_kinematic_body(start, Quat::IDENTITY);
        let collider = ctx
            .physics
            .add_sensor_sphere(body, self.scenario.agent_radius);
        ctx.physics.attach_entity(collider, agent);
        self.agent_entity = Some(agent);
        self.agent_body = Some(body);

        log::info!(
            "Scenario ready: {} obstacles, {} clicks",
            self.obstacles.len(),
            self.scenario.clicks.len()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        let dt = ctx.time.delta_seconds();

        self.log_events(ctx);
        self.replay_clicks(ctx);
        self.forward_contacts(ctx);

        self.pathfinder.step();
        let on_surface = self.pathfinder.grid().contains(self.follower.position().xz());
        self.follower.set_on_surface(on_surface);

        {
            let mut nav = NavContext {
                scene: &mut ctx.world,
                pathfinder: &mut self.pathfinder,
                mover: &mut self.follower,
                renderer: &mut self.line,
                events: &mut ctx.events,
                delta_time: dt,
            };
            self.agent.update(&mut nav);
        }

        self.follower.advance(dt);
        let position = self.follower.position();
        if let Some(body) = self.agent_body {
            ctx.physics.set_kinematic_position(body, position);
        }
        if let Some(agent) = self.agent_entity {
            ctx.world.set_position(agent, position);
        }

        if self.finished(ctx.time.frame_count()) {
            ctx.quit();
        }
    }

    fn shutdown(&mut self, ctx: &mut EngineContext) {
        let position = self
            .agent_body
            .and_then(|body| ctx.physics.get_position(body))
            .unwrap_or_else(|| self.follower.position());

        log::info!(
            "Finished in state {} at {position}: {} goals reached, {} reroutes, route line {:.2} long",
            self.agent.state(),
            self.goals_reached,
            self.reroutes,
            self.line.length()
        );
    }
}

fn load_scenario() -> Result<Scenario, SceneError> {
    match std::env::args().nth(1) {
        Some(path) => Scenario::load(path),
        None => Ok(Scenario::demo()),
    }
}

fn main() {
    let scenario = match load_scenario() {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Scenario error: {e}");
            std::process::exit(1);
        }
    };

    let tick_rate = 60;
    let config = EngineConfig::default()
        .with_title(format!("Waypoint - {}", scenario.name))
        .with_tick_rate(tick_rate)
        .with_max_frames(MAX_SECONDS * u64::from(tick_rate));

    let result = Engine::new(config, DemoGame::new(scenario)).and_then(Engine::run);
    if let Err(e) = result {
        eprintln!("Engine error: {e}");
        std::process::exit(1);
    }
}
