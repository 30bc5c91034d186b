//! Step scheduler: drives a [`SolveSession`] one step per tick.
//!
//! # State machine
//!
//! ```text
//!          start()            session closes
//! Idle ─────────────▶ Solving ───────────────▶ Complete
//!   ▲                 │  ▲                        │
//!   │         pause() ▼  │ resume()               │ start()
//!   │                Paused                       ▼
//!   └──────── reset() from any state ◀──────── Solving
//! ```
//!
//! Ticks run on a [`TickClock`] that only moves when the driver calls
//! [`StepScheduler::advance_time`]. The next tick is armed when the current
//! one finishes, never at a fixed rate, so ticks cannot overlap. Every tick
//! and every `reset()` goes through a cancellation token, so a tick armed
//! for an abandoned session can never fire.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::engine::{TickClock, TickQueue, TickTime, TickToken};
use crate::error::{TourError, TourResult};
use crate::tour::distance::CostMatrix;
use crate::tour::nearest::{SolveSession, StepOutcome};

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// No session.
    Idle,
    /// Session running; ticks advance it.
    Solving,
    /// Session frozen until `resume()`.
    Paused,
    /// Tour closed; session kept for display.
    Complete,
}

impl SolveStatus {
    /// Whether a session is running or paused.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Solving | Self::Paused)
    }

    /// Text for the status readout.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Solving => "Solving...",
            Self::Paused => "Paused",
            Self::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Solving => "Solving",
            Self::Paused => "Paused",
            Self::Complete => "Complete",
        };
        f.write_str(name)
    }
}

/// What pausing does to the tick timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PausePolicy {
    /// Cancel the pending tick on pause and re-arm it on resume.
    #[default]
    Suspend,
    /// Keep ticking while paused; paused ticks only re-arm themselves.
    Poll,
}

/// State published after every change a renderer should see.
#[derive(Debug, Clone, Copy)]
pub struct StepFrame<'a> {
    /// Tour so far, length 0..=N+1.
    pub tour: &'a [usize],
    /// Running distance.
    pub distance: u64,
    /// Scheduler state after the change.
    pub status: SolveStatus,
    /// Steps performed in this session.
    pub step: u64,
    /// Step that produced this frame; `None` for the opening frame.
    pub outcome: Option<StepOutcome>,
    /// Engine time of the change.
    pub time: TickTime,
}

/// Receives every published frame.
pub trait TourObserver {
    /// Called once per published frame.
    fn publish(&mut self, frame: &StepFrame<'_>);
}

impl<F> TourObserver for F
where
    F: FnMut(&StepFrame<'_>),
{
    fn publish(&mut self, frame: &StepFrame<'_>) {
        self(frame);
    }
}

/// Observer that ignores every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TourObserver for NullObserver {
    fn publish(&mut self, _frame: &StepFrame<'_>) {}
}

/// Owned copy of the scheduler's visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourSnapshot {
    /// Tour so far.
    pub tour: Vec<usize>,
    /// Running distance.
    pub distance: u64,
    /// Scheduler state.
    pub status: SolveStatus,
    /// Steps performed.
    pub steps: u64,
    /// Ticks that fired while paused under [`PausePolicy::Poll`].
    pub idle_ticks: u64,
}

/// Tick-driven animation driver for the nearest-neighbor builder.
#[derive(Debug)]
pub struct StepScheduler {
    step_delay_ms: u64,
    pause_policy: PausePolicy,
    status: SolveStatus,
    session: Option<SolveSession>,
    clock: TickClock,
    queue: TickQueue,
    /// The only tick allowed to fire.
    pending: Option<TickToken>,
    steps: u64,
    idle_ticks: u64,
}

impl StepScheduler {
    /// Create an idle scheduler.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Config` if `step_delay_ms` is zero.
    pub fn new(step_delay_ms: u64, pause_policy: PausePolicy) -> TourResult<Self> {
        check_delay(step_delay_ms)?;
        Ok(Self {
            step_delay_ms,
            pause_policy,
            status: SolveStatus::Idle,
            session: None,
            clock: TickClock::new(),
            queue: TickQueue::new(),
            pending: None,
            steps: 0,
            idle_ticks: 0,
        })
    }

    /// Open a session on `matrix` at `start` and arm the first tick.
    ///
    /// The first tick is due immediately, so the next `advance_time` call
    /// performs the first step.
    ///
    /// # Errors
    ///
    /// - `ConcurrentSolveAttempt` while Solving or Paused
    /// - `InsufficientCities` for fewer than two cities
    /// - `InvalidStartIndex` if `start` is not a city index
    ///
    /// The scheduler is unchanged on error.
    pub fn start(
        &mut self,
        matrix: Arc<CostMatrix>,
        start: usize,
        observer: &mut impl TourObserver,
    ) -> TourResult<()> {
        if self.status.is_active() {
            return Err(TourError::ConcurrentSolveAttempt {
                status: self.status,
            });
        }
        let city_count = matrix.len();
        let Some(session) = SolveSession::begin(matrix, start)? else {
            return Err(TourError::InsufficientCities { city_count });
        };

        self.cancel_pending();
        self.session = Some(session);
        self.status = SolveStatus::Solving;
        self.steps = 0;
        self.idle_ticks = 0;
        info!(start, city_count, delay_ms = self.step_delay_ms, "solve started");

        self.publish(None, observer);
        self.arm(self.clock.now());
        Ok(())
    }

    /// Freeze the session. Returns `false` unless the scheduler was Solving.
    pub fn pause(&mut self) -> bool {
        if self.status != SolveStatus::Solving {
            return false;
        }
        self.status = SolveStatus::Paused;
        if self.pause_policy == PausePolicy::Suspend {
            self.cancel_pending();
        }
        info!(step = self.steps, policy = ?self.pause_policy, "solve paused");
        true
    }

    /// Unfreeze the session. Returns `false` unless the scheduler was Paused.
    pub fn resume(&mut self) -> bool {
        if self.status != SolveStatus::Paused {
            return false;
        }
        self.status = SolveStatus::Solving;
        if self.pending.is_none() {
            self.arm(self.clock.now().add_millis(self.step_delay_ms));
        }
        info!(step = self.steps, "solve resumed");
        true
    }

    /// Pause when Solving, resume when Paused. Returns whether anything
    /// changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            SolveStatus::Solving => self.pause(),
            SolveStatus::Paused => self.resume(),
            SolveStatus::Idle | SolveStatus::Complete => false,
        }
    }

    /// Abandon any session and return to Idle. Safe in any state.
    pub fn reset(&mut self) {
        if self.status != SolveStatus::Idle {
            debug!(status = %self.status, "scheduler reset");
        }
        self.cancel_pending();
        self.queue.clear();
        self.session = None;
        self.status = SolveStatus::Idle;
        self.steps = 0;
        self.idle_ticks = 0;
    }

    /// Move the clock forward by `elapsed_ms`, firing every tick that falls
    /// due on the way. Returns the number of ticks fired.
    pub fn advance_time(&mut self, elapsed_ms: u64, observer: &mut impl TourObserver) -> usize {
        let target = self.clock.now().add_millis(elapsed_ms);
        let mut fired = 0;
        while let Some(tick) = self.queue.next_due(target) {
            self.clock.advance_to(tick.time);
            if self.fire(tick.token, tick.time, observer) {
                fired += 1;
            }
        }
        self.clock.advance_to(target);
        fired
    }

    /// Fire ticks until the session stops Solving. Returns ticks fired.
    ///
    /// Stops early when paused, so a polling pause cannot spin forever.
    pub fn run_until_settled(&mut self, observer: &mut impl TourObserver) -> usize {
        let mut fired = 0;
        while self.status == SolveStatus::Solving {
            let Some(next) = self.queue.next_tick_time() else {
                break;
            };
            let wait = next.millis_since(self.clock.now());
            let count = self.advance_time(wait, observer);
            if count == 0 {
                break;
            }
            fired += count;
        }
        fired
    }

    // Returns false for stale ticks.
    fn fire(&mut self, token: TickToken, at: TickTime, observer: &mut impl TourObserver) -> bool {
        if self.pending != Some(token) {
            return false;
        }
        self.pending = None;

        match self.status {
            SolveStatus::Paused => {
                self.idle_ticks += 1;
                trace!(idle_ticks = self.idle_ticks, "paused tick");
                self.arm(at.add_millis(self.step_delay_ms));
            }
            SolveStatus::Solving => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                let outcome = session.advance();
                self.steps += 1;
                debug!(step = self.steps, ?outcome, distance = session.distance(), "step");

                if session.is_complete() {
                    self.status = SolveStatus::Complete;
                    info!(
                        steps = self.steps,
                        distance = session.distance(),
                        "solve complete"
                    );
                } else {
                    self.arm(at.add_millis(self.step_delay_ms));
                }
                self.publish(Some(outcome), observer);
            }
            SolveStatus::Idle | SolveStatus::Complete => return false,
        }
        true
    }

    fn arm(&mut self, at: TickTime) {
        self.cancel_pending();
        self.pending = Some(self.queue.schedule(at));
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.queue.cancel(token);
        }
    }

    fn publish(&self, outcome: Option<StepOutcome>, observer: &mut impl TourObserver) {
        observer.publish(&StepFrame {
            tour: self.tour(),
            distance: self.distance(),
            status: self.status,
            step: self.steps,
            outcome,
            time: self.clock.now(),
        });
    }

    /// Change the delay used for ticks armed from now on.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Config` if `millis` is zero.
    pub fn set_step_delay(&mut self, millis: u64) -> TourResult<()> {
        check_delay(millis)?;
        self.step_delay_ms = millis;
        Ok(())
    }

    /// Delay between steps.
    #[must_use]
    pub const fn step_delay_ms(&self) -> u64 {
        self.step_delay_ms
    }

    /// Pause behaviour.
    #[must_use]
    pub const fn pause_policy(&self) -> PausePolicy {
        self.pause_policy
    }

    /// Current state.
    #[must_use]
    pub const fn status(&self) -> SolveStatus {
        self.status
    }

    /// Current engine time.
    #[must_use]
    pub const fn now(&self) -> TickTime {
        self.clock.now()
    }

    /// Session in progress or just completed.
    #[must_use]
    pub const fn session(&self) -> Option<&SolveSession> {
        self.session.as_ref()
    }

    /// Tour so far; empty when Idle.
    #[must_use]
    pub fn tour(&self) -> &[usize] {
        self.session.as_ref().map_or(&[], SolveSession::tour)
    }

    /// Running distance; zero when Idle.
    #[must_use]
    pub fn distance(&self) -> u64 {
        self.session.as_ref().map_or(0, SolveSession::distance)
    }

    /// Steps performed in this session.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Ticks that fired while paused.
    #[must_use]
    pub const fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }

    /// Whether a tick is armed.
    #[must_use]
    pub const fn has_pending_tick(&self) -> bool {
        self.pending.is_some()
    }

    /// Owned copy of the visible state.
    #[must_use]
    pub fn snapshot(&self) -> TourSnapshot {
        TourSnapshot {
            tour: self.tour().to_vec(),
            distance: self.distance(),
            status: self.status,
            steps: self.steps,
            idle_ticks: self.idle_ticks,
        }
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self {
            step_delay_ms: crate::config::DEFAULT_STEP_DELAY_MS,
            pause_policy: PausePolicy::default(),
            status: SolveStatus::Idle,
            session: None,
            clock: TickClock::new(),
            queue: TickQueue::new(),
            pending: None,
            steps: 0,
            idle_ticks: 0,
        }
    }
}

fn check_delay(millis: u64) -> TourResult<()> {
    if millis == 0 {
        return Err(TourError::config("step delay must be at least 1ms"));
    }
    Ok(())
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod proptests {
    use super::*;
    use crate::tour::city::{City, Point};
    use proptest::prelude::*;

    fn arb_matrix() -> impl Strategy<Value = Arc<CostMatrix>> {
        prop::collection::vec((0.0f64..800.0, 0.0f64..600.0), 2..25).prop_map(|pts| {
            let cities: Vec<City> = pts
                .into_iter()
                .enumerate()
                .filter_map(|(i, (x, y))| City::new(Point::new(x, y), format!("C{i}")).ok())
                .collect();
            Arc::new(CostMatrix::from_cities(&cities))
        })
    }

    fn arb_policy() -> impl Strategy<Value = PausePolicy> {
        prop_oneof![Just(PausePolicy::Suspend), Just(PausePolicy::Poll)]
    }

    proptest! {
        /// No tour element is appended between pause() and resume().
        #[test]
        fn prop_pause_freezes_tour(
            matrix in arb_matrix(),
            policy in arb_policy(),
            run_ms in 0u64..500,
            paused_ms in 0u64..5_000,
        ) {
            let mut s = StepScheduler::new(50, policy).expect("valid");
            s.start(matrix, 0, &mut NullObserver).expect("start");
            s.advance_time(run_ms, &mut NullObserver);

            if s.pause() {
                let frozen = s.tour().to_vec();
                let distance = s.distance();
                s.advance_time(paused_ms, &mut NullObserver);
                prop_assert_eq!(s.tour(), frozen.as_slice());
                prop_assert_eq!(s.distance(), distance);
                prop_assert!(s.resume());
            }
        }

        /// A driven solve ends Complete with the nearest-neighbor tour and
        /// a running distance equal to the recomputed tour cost.
        #[test]
        fn prop_driven_solve_matches_builder(matrix in arb_matrix(), delay in 1u64..200) {
            let n = matrix.len();
            let mut s = StepScheduler::new(delay, PausePolicy::Suspend).expect("valid");
            s.start(Arc::clone(&matrix), 0, &mut NullObserver).expect("start");
            let fired = s.run_until_settled(&mut NullObserver);

            prop_assert_eq!(fired, n);
            prop_assert_eq!(s.status(), SolveStatus::Complete);
            prop_assert_eq!(s.tour().len(), n + 1);
            prop_assert_eq!(s.distance(), matrix.tour_cost(s.tour()));

            let (expected, _) = crate::tour::nearest::nearest_neighbor_tour(matrix, 0)
                .expect("valid")
                .expect("n >= 2");
            prop_assert_eq!(s.tour(), expected.as_slice());
        }

        /// Tour length grows by at most one per published frame.
        #[test]
        fn prop_frames_grow_by_one(matrix in arb_matrix()) {
            let mut lengths = Vec::new();
            let mut observer = |frame: &StepFrame<'_>| lengths.push(frame.tour.len());
            let mut s = StepScheduler::default();
            s.start(matrix, 0, &mut observer).expect("start");
            s.run_until_settled(&mut observer);

            for pair in lengths.windows(2) {
                prop_assert_eq!(pair[1], pair[0] + 1);
            }
        }
    }
}
