//! Navigation Event Queue
//!
//! A double-buffered queue of navigation events. The agent, the goal
//! publisher and the host push events while a frame runs; consumers (logging,
//! debug overlays, scripted checks) read them during the next frame, after
//! the engine swaps the buffers.
//!
//! # Example
//!
//! ```ignore
//! // Inside the agent
//! ctx.events.push(NavEvent::GoalReached { goal, position });
//!
//! // Next frame, in the host
//! for event in ctx.events.iter() {
//!     if let NavEvent::GoalReached { position, .. } = event {
//!         log::info!("Reached {position}");
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;
use hecs::Entity;

use crate::ai::NavState;

// ============================================================================
// Event Types
// ============================================================================

/// Things that happened to the navigating agent or its goal.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum NavEvent {
    /// The goal publisher placed or moved the goal marker.
    GoalPlaced {
        /// Marker entity
        goal: Entity,
        /// New marker position
        position: Vec3,
    },

    /// The agent discovered and bound a goal.
    GoalBound {
        /// Bound goal entity
        goal: Entity,
        /// Goal position at binding time
        position: Vec3,
    },

    /// The agent asked the pathfinder for a new route.
    RouteRequested {
        /// Agent position
        start: Vec3,
        /// Goal position
        goal: Vec3,
        /// True for out-of-cadence requests (obstacle contact)
        forced: bool,
    },

    /// The agent reached its goal and destroyed it.
    GoalReached {
        /// The consumed goal entity
        goal: Entity,
        /// Agent position on arrival
        position: Vec3,
    },

    /// The agent touched an obstacle and is rerouting.
    ObstacleContact {
        /// The obstacle entity
        obstacle: Entity,
    },

    /// Movement resumed after an obstacle contact.
    Resumed,

    /// The navigation state machine changed state.
    StateChanged {
        /// Previous state
        from: NavState,
        /// New state
        to: NavState,
    },

    /// The agent left the navigable surface.
    SurfaceLost {
        /// Agent position when the surface was lost
        position: Vec3,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for frame-consistent event processing.
///
/// Events pushed during frame N are available for reading during frame N+1.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<NavEvent>,
    /// Events from previous frame, ready for processing
    processing: VecDeque<NavEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 32;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next frame.
    #[inline]
    pub fn push(&mut self, event: NavEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Call this once per frame, at the start of the update loop.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &NavEvent> {
        self.processing.iter()
    }

    /// Iterate over events pushed during the current frame.
    #[inline]
    pub fn iter_pending(&self) -> impl Iterator<Item = &NavEvent> {
        self.pending.iter()
    }

    /// Drain all events from the previous frame.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = NavEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for next frame.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
