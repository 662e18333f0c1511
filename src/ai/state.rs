//! Navigation states

use std::fmt;

/// Where the navigation agent is in its goal-seeking cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavState {
    /// No goal held; the agent is suspended and shows no route.
    #[default]
    Idle,
    /// A goal is held and the agent moves toward it.
    Seeking,
    /// The goal was reached this tick. Transient: the agent settles in `Idle`
    /// before the tick ends.
    Arrived,
    /// Suspended after touching an obstacle, waiting for the resume delay.
    Rerouting,
}

impl NavState {
    /// State name for debugging and logging.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NavState::Idle => "Idle",
            NavState::Seeking => "Seeking",
            NavState::Arrived => "Arrived",
            NavState::Rerouting => "Rerouting",
        }
    }

    /// Whether the agent holds a goal in this state.
    #[must_use]
    pub fn has_goal(self) -> bool {
        matches!(self, NavState::Seeking | NavState::Rerouting)
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
