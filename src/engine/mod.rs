//! Cooperative single-threaded tick engine.
//!
//! Provides the pieces the step scheduler is driven by:
//! - A virtual millisecond clock that only moves when told to
//! - A delay queue with explicit cancellation tokens
//! - A seeded RNG so random city layouts are reproducible

pub mod clock;
pub mod rng;
pub mod scheduler;

use serde::{Deserialize, Serialize};

pub use clock::TickClock;
pub use rng::TourRng;
pub use scheduler::{ScheduledTick, TickQueue, TickToken};

/// Point on the engine's timeline, in whole milliseconds.
///
/// Integer milliseconds keep tick ordering exact: two ticks armed for the
/// same instant compare equal and fall back to insertion order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct TickTime {
    millis: u64,
}

impl TickTime {
    /// Engine start.
    pub const ZERO: Self = Self { millis: 0 };

    /// Create a time from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Milliseconds since engine start.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Add a delay, saturating at `u64::MAX`.
    #[must_use]
    pub const fn add_millis(self, millis: u64) -> Self {
        Self {
            millis: self.millis.saturating_add(millis),
        }
    }

    /// Milliseconds from `earlier` to `self`, zero if `earlier` is later.
    #[must_use]
    pub const fn millis_since(self, earlier: Self) -> u64 {
        self.millis.saturating_sub(earlier.millis)
    }
}

impl std::fmt::Display for TickTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_time_ordering() {
        let a = TickTime::from_millis(10);
        let b = TickTime::from_millis(20);
        assert!(a < b);
        assert_eq!(TickTime::ZERO, TickTime::default());
    }

    #[test]
    fn test_tick_time_add_saturates() {
        let t = TickTime::from_millis(u64::MAX - 1).add_millis(10);
        assert_eq!(t.as_millis(), u64::MAX);
    }

    #[test]
    fn test_millis_since() {
        let a = TickTime::from_millis(30);
        let b = TickTime::from_millis(75);
        assert_eq!(b.millis_since(a), 45);
        assert_eq!(a.millis_since(b), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(TickTime::from_millis(50).to_string(), "50ms");
    }
}
