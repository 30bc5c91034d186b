//! Virtual tick clock.
//!
//! The clock never reads wall time. Drivers advance it explicitly, either
//! with real elapsed milliseconds (terminal UI) or in fixed jumps (headless
//! runs and tests), which keeps every solve replayable.

use serde::{Deserialize, Serialize};

use crate::engine::TickTime;

/// Monotonic millisecond clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickClock {
    /// Current engine time.
    current: TickTime,
    /// Number of times the clock has been advanced.
    advance_count: u64,
}

impl TickClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current engine time.
    #[must_use]
    pub const fn now(&self) -> TickTime {
        self.current
    }

    /// Number of advances so far.
    #[must_use]
    pub const fn advance_count(&self) -> u64 {
        self.advance_count
    }

    /// Move the clock forward by `millis`.
    ///
    /// Returns the new time.
    pub fn advance_by(&mut self, millis: u64) -> TickTime {
        self.current = self.current.add_millis(millis);
        self.advance_count += 1;
        self.current
    }

    /// Move the clock to `target`. Targets in the past are ignored so the
    /// clock never runs backwards.
    pub fn advance_to(&mut self, target: TickTime) -> TickTime {
        if target > self.current {
            self.current = target;
            self.advance_count += 1;
        }
        self.current
    }

    /// Reset clock to time zero.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn reset(&mut self) {
        self.current = TickTime::ZERO;
        self.advance_count = 0;
    }
}
