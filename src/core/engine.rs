//! Core Engine struct and main simulation loop

use crate::core::{EventQueue, Time};
use crate::ecs::World;
use crate::physics::Physics;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Name shown in logs
    pub title: String,
    /// Fixed simulation steps per second
    pub tick_rate: u32,
    /// Stop after this many frames (None runs until the game quits)
    pub max_frames: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Engine"),
            tick_rate: 60,
            max_frames: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the fixed step rate
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Limit the run to a number of frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }
}

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once before the first frame
    fn init(&mut self, engine: &mut EngineContext);

    /// Called every frame for game logic updates
    fn update(&mut self, engine: &mut EngineContext);

    /// Called when the engine stops
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Context passed to game callbacks
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// ECS world
    pub world: World,
    /// Physics world, stepped after every update
    pub physics: Physics,
    /// Navigation events, swapped at the start of every frame
    pub events: EventQueue,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    fn new(tick_rate: u32) -> Self {
        Self {
            time: Time::new(tick_rate),
            world: World::new(),
            physics: Physics::new(),
            events: EventQueue::new(),
            should_quit: false,
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
    initialized: bool,
}

impl<G: Game> Engine<G> {
    /// Create a new engine with the given game
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable
    pub fn new(config: EngineConfig, game: G) -> Result<Self, EngineError> {
        if config.tick_rate == 0 {
            return Err(EngineError::InvalidTickRate);
        }
        let context = EngineContext::new(config.tick_rate);
        Ok(Self {
            config,
            game,
            context,
            initialized: false,
        })
    }

    /// Run frames until the game quits or the frame limit is reached
    pub fn run(mut self) -> Result<(), EngineError> {
        // A host or test may already have installed a logger
        let _ = env_logger::try_init();
        log::info!(
            "Starting engine: {} at {} ticks/s",
            self.config.title,
            self.config.tick_rate
        );

        while self.step() {}

        self.game.shutdown(&mut self.context);
        log::info!(
            "Engine stopped after {} frames ({:.2}s simulated)",
            self.context.time.frame_count(),
            self.context.time.elapsed_seconds()
        );
        Ok(())
    }

    /// Run a single frame. Returns `false` once the engine should stop.
    pub fn step(&mut self) -> bool {
        if !self.initialized {
            self.game.init(&mut self.context);
            self.initialized = true;
            log::info!("Engine initialized successfully");
        }

        if self.context.should_quit() || self.reached_frame_limit() {
            return false;
        }

        self.context.events.swap();
        self.context.time.advance();

        self.game.update(&mut self.context);

        let dt = self.context.time.delta_seconds();
        self.context.physics.step(dt);

        !self.context.should_quit() && !self.reached_frame_limit()
    }

    fn reached_frame_limit(&self) -> bool {
        self.config
            .max_frames
            .is_some_and(|max| self.context.time.frame_count() >= max)
    }

    #[must_use]
    pub fn game(&self) -> &G {
        &self.game
    }

    #[must_use]
    pub fn context(&self) -> &EngineContext {
        &self.context
    }
}

/// Errors raised by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The tick rate must be at least one step per second
    InvalidTickRate,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTickRate => write!(f, "tick rate must be greater than zero"),
        }
    }
}

impl std::error::Error for EngineError {}
