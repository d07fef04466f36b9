#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement-threshold gate that decides when the window is worth repainting.

use endless_ground_core::WorldPosition;

/// Manhattan distance the focal point must drift before a refresh fires.
pub const DEFAULT_STEP_THRESHOLD: u64 = 4;

/// Observes the focal position and gates refresh work behind accumulated
/// movement.
///
/// The tracker never refreshes anything itself. Callers ask
/// [`should_refresh`](ViewportTracker::should_refresh) once per tick, run
/// the refresher when it answers true, and then record the applied position
/// with [`mark_applied`](ViewportTracker::mark_applied). The visible window
/// may therefore lag the focal point by up to `threshold - 1` cells.
#[derive(Clone, Copy, Debug)]
pub struct ViewportTracker {
    last_applied: Option<WorldPosition>,
    threshold: u64,
}

impl ViewportTracker {
    /// Creates a tracker using the default movement threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_STEP_THRESHOLD)
    }

    /// Creates a tracker with an explicit movement threshold.
    #[must_use]
    pub const fn with_threshold(threshold: u64) -> Self {
        Self {
            last_applied: None,
            threshold,
        }
    }

    /// Reports whether enough movement accumulated to justify a refresh.
    ///
    /// Always true before the first applied position.
    #[must_use]
    pub fn should_refresh(&self, current: WorldPosition) -> bool {
        match self.last_applied {
            None => true,
            Some(applied) => applied.manhattan_distance(current) >= self.threshold,
        }
    }

    /// Records the focal position a refresh was applied at.
    pub fn mark_applied(&mut self, current: WorldPosition) {
        self.last_applied = Some(current);
    }

    /// Position of the most recently applied refresh, if any.
    #[must_use]
    pub const fn last_applied(&self) -> Option<WorldPosition> {
        self.last_applied
    }
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new()
    }
}
