//! Delay queue with cancellation tokens.
//!
//! Implements "schedule one unit of work after a delay, cancel the pending
//! schedule" on top of a priority queue:
//! - Ticks are released in time order
//! - Ties are broken by insertion order (sequence number)
//! - A cancelled token is never released, even if its time has passed

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use serde::{Deserialize, Serialize};

use crate::engine::TickTime;

/// Handle to a scheduled tick, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

impl TickToken {
    /// Raw sequence number behind the token.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// A tick released by the queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduledTick {
    /// Time the tick was armed for.
    pub time: TickTime,
    /// Token returned when the tick was scheduled.
    pub token: TickToken,
}

impl ScheduledTick {
    /// Create a new scheduled tick.
    #[must_use]
    pub const fn new(time: TickTime, token: TickToken) -> Self {
        Self { time, token }
    }
}

// Min-heap ordering by (time, sequence)
impl PartialEq for ScheduledTick {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.token == other.token
    }
}

impl Eq for ScheduledTick {}

impl PartialOrd for ScheduledTick {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTick {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.time.cmp(&other.time) {
            std::cmp::Ordering::Equal => self.token.0.cmp(&other.token.0),
            ord => ord,
        }
    }
}

/// Time-ordered tick queue with explicit cancellation.
///
/// Cancellation is lazy: the heap entry stays until it reaches the front and
/// is then discarded because its token is no longer live.
///
/// # Example
///
/// ```rust
/// use tourviz::engine::scheduler::TickQueue;
/// use tourviz::engine::TickTime;
///
/// let mut queue = TickQueue::new();
/// let token = queue.schedule(TickTime::from_millis(50));
/// assert!(queue.cancel(token));
/// assert!(queue.next_due(TickTime::from_millis(100)).is_none());
/// ```
#[derive(Debug, Default)]
pub struct TickQueue {
    /// Min-heap ordered by (time, sequence).
    queue: BinaryHeap<Reverse<ScheduledTick>>,
    /// Tokens scheduled and neither released nor cancelled.
    live: HashSet<TickToken>,
    /// Monotonic sequence counter for tie-breaking and token identity.
    sequence: u64,
}

impl TickQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a tick for `time` and return its cancellation token.
    pub fn schedule(&mut self, time: TickTime) -> TickToken {
        let token = TickToken(self.sequence);
        self.sequence += 1;

        self.queue.push(Reverse(ScheduledTick::new(time, token)));
        self.live.insert(token);
        token
    }

    /// Cancel a pending tick.
    ///
    /// Returns `false` if the token was already released or cancelled.
    pub fn cancel(&mut self, token: TickToken) -> bool {
        self.live.remove(&token)
    }

    /// Whether `token` is still pending.
    #[must_use]
    pub fn is_pending(&self, token: TickToken) -> bool {
        self.live.contains(&token)
    }

    /// Release the earliest live tick whose time is at or before `now`.
    #[must_use]
    pub fn next_due(&mut self, now: TickTime) -> Option<ScheduledTick> {
        self.discard_cancelled();
        match self.queue.peek() {
            Some(Reverse(tick)) if tick.time <= now => {
                let tick = *tick;
                self.queue.pop();
                self.live.remove(&tick.token);
                Some(tick)
            }
            _ => None,
        }
    }

    /// Time of the earliest live tick, if any.
    #[must_use]
    pub fn next_tick_time(&mut self) -> Option<TickTime> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse(tick)| tick.time)
    }

    /// Number of live ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no live tick is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.live.clear();
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse(tick)) = self.queue.peek() {
            if self.live.contains(&tick.token) {
                break;
            }
            self.queue.pop();
        }
    }
}
