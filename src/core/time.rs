//! Fixed-step simulation clock

/// Simulation time tracking.
///
/// The headless engine advances in fixed steps, so `delta_seconds` is the
/// same every frame and elapsed time is an exact multiple of it.
#[derive(Debug, Clone)]
pub struct Time {
    /// Seconds per frame
    delta: f32,
    /// Seconds since the first frame
    elapsed: f64,
    /// Frames advanced so far
    frame: u64,
}

impl Time {
    /// Create a clock stepping at `tick_rate` frames per second
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        Self::with_delta(1.0 / tick_rate.max(1) as f32)
    }

    /// Create a clock with an explicit per-frame delta
    #[must_use]
    pub fn with_delta(delta: f32) -> Self {
        Self {
            delta,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Advance by one frame
    pub fn advance(&mut self) {
        self.elapsed += f64::from(self.delta);
        self.frame += 1;
    }

    /// Seconds covered by the current frame
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    /// Total simulated seconds
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Number of frames advanced
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
