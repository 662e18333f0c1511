//! One-shot Deferred Tasks
//!
//! A tiny timer list for "run this action after N seconds" callbacks. The
//! owner advances the scheduler once per tick and gets back the actions that
//! became due, so it can run them with whatever context it has at hand.
//!
//! # Example
//!
//! ```ignore
//! let mut scheduler = Scheduler::new();
//! let handle = scheduler.schedule(0.5, Task::Resume);
//!
//! // Each tick
//! for task in scheduler.advance(dt) {
//!     run(task);
//! }
//!
//! // Changed our mind
//! scheduler.cancel(handle);
//! ```

/// Slack allowed when comparing accumulated frame deltas against a delay.
///
/// Summing a 60 Hz delta thirty times in `f32` lands a few ulps away from
/// 0.5, so timers compare with this tolerance instead of exactly.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    /// Seconds left before the task fires
    remaining: f32,
    action: T,
}

/// Cancellable one-shot task scheduler.
///
/// Each task counts down its own delay, so precision does not depend on how
/// long the scheduler has been running.
#[derive(Debug)]
pub struct Scheduler<T> {
    /// Next handle id
    next_id: u64,
    /// Tasks that have not fired yet, in scheduling order
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// Schedule `action` to fire `delay` seconds from now.
    ///
    /// Negative delays fire on the next `advance`.
    pub fn schedule(&mut self, delay: f32, action: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            handle,
            remaining: delay.max(0.0),
            action,
        });
        handle
    }

    /// Cancel a task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.tasks.iter().position(|task| task.handle == handle) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Count every task down by `dt` and take the ones that are now due.
    ///
    /// Actions come back in due order; ties keep scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        for task in &mut self.tasks {
            task.remaining -= dt;
        }

        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .tasks
            .drain(..)
            .partition(|task| task.remaining <= TIMER_EPSILON);
        self.tasks = pending;

        due.sort_by(|a, b| {
            a.remaining
                .total_cmp(&b.remaining)
                .then(a.handle.0.cmp(&b.handle.0))
        });
        due.into_iter().map(|task| task.action).collect()
    }

    /// Number of tasks waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    /// Advance one frame at a time, returning the frame the first action fired on
    fn frames_until_fired<T>(scheduler: &mut Scheduler<T>, limit: u32) -> Option<u32> {
        (1..=limit).find(|_| !scheduler.advance(FRAME).is_empty())
    }

    #[test]
    fn test_task_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.5, "resume");

        assert!(scheduler.advance(0.25).is_empty());
        assert_eq!(scheduler.advance(0.25), vec!["resume"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_task_fires_on_exact_frame_at_60hz() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.5, ());

        assert_eq!(frames_until_fired(&mut scheduler, 60), Some(30));
    }

    #[test]
    fn test_precision_after_long_session() {
        let mut scheduler = Scheduler::new();
        let marathon = scheduler.schedule(7200.0, 'm');

        // A bit over an hour of frames
        for _ in 0..(61 * 60 * 60) {
            assert!(scheduler.advance(FRAME).is_empty());
        }

        scheduler.schedule(0.5, 'r');
        assert_eq!(frames_until_fired(&mut scheduler, 60), Some(30));
        assert!(scheduler.cancel(marathon));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(0.5, 1);

        assert_eq!(scheduler.pending_count(), 1);
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle), "Second cancel should be a no-op");
        assert!(scheduler.advance(1.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.75, 'c');
        scheduler.schedule(0.25, 'a');
        scheduler.schedule(0.25, 'b');

        assert_eq!(scheduler.advance(1.0), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_delay_counts_from_scheduling() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(1.0);
        scheduler.schedule(0.5, ());

        assert!(scheduler.advance(0.25).is_empty());
        assert_eq!(scheduler.advance(0.25).len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.1, 1);
        scheduler.schedule(0.2, 2);

        scheduler.clear();

        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.advance(1.0).is_empty());
    }
}
