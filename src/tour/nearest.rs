//! Nearest-neighbor tour construction, one city per step.
//!
//! Starting at `start`, each step moves to the closest unvisited city. The
//! scan runs in index order and only a strictly smaller cost replaces the
//! current candidate, so ties go to the lowest index. When nothing is left
//! unvisited the next step returns to `start` and the session is complete.
//!
//! # Invariant
//!
//! Every city index is in exactly one of `unvisited` and the open tour
//! (the tour without its closing repeat of `start`).

use std::sync::Arc;

use serde::Serialize;

use crate::error::{TourError, TourResult};
use crate::tour::distance::CostMatrix;

/// What one call to [`SolveSession::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// Moved to the nearest unvisited city.
    Visited {
        /// City appended to the tour.
        city: usize,
        /// Cost of the edge just walked.
        edge_cost: u32,
    },
    /// Returned to the start city; the tour is closed.
    Closed {
        /// Cost of the closing edge.
        edge_cost: u32,
    },
    /// The session was already complete; nothing changed.
    AlreadyComplete,
}

/// In-progress state of one heuristic run.
#[derive(Debug, Clone)]
pub struct SolveSession {
    matrix: Arc<CostMatrix>,
    start: usize,
    current: usize,
    /// Ascending, so the first-match scan breaks ties by lowest index.
    unvisited: Vec<usize>,
    tour: Vec<usize>,
    distance: u64,
    complete: bool,
}

impl SolveSession {
    /// Open a session at `start`.
    ///
    /// Returns `Ok(None)` when the matrix has fewer than two cities: there
    /// is nothing to solve and no session is created.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidStartIndex` if `start` is not a city index.
    pub fn begin(matrix: Arc<CostMatrix>, start: usize) -> TourResult<Option<Self>> {
        let n = matrix.len();
        if n < 2 {
            return Ok(None);
        }
        if start >= n {
            return Err(TourError::InvalidStartIndex {
                index: start,
                city_count: n,
            });
        }

        let unvisited = (0..n).filter(|&i| i != start).collect();
        let mut tour = Vec::with_capacity(n + 1);
        tour.push(start);

        Ok(Some(Self {
            matrix,
            start,
            current: start,
            unvisited,
            tour,
            distance: 0,
            complete: false,
        }))
    }

    /// Perform one heuristic step.
    pub fn advance(&mut self) -> StepOutcome {
        if self.complete {
            return StepOutcome::AlreadyComplete;
        }

        let Some((slot, city, edge_cost)) = self.nearest_unvisited() else {
            let edge_cost = self.matrix.cost(self.current, self.start);
            self.tour.push(self.start);
            self.distance += u64::from(edge_cost);
            self.current = self.start;
            self.complete = true;
            return StepOutcome::Closed { edge_cost };
        };

        self.unvisited.remove(slot);
        self.tour.push(city);
        self.distance += u64::from(edge_cost);
        self.current = city;
        StepOutcome::Visited { city, edge_cost }
    }

    /// Run to completion, returning the closed tour.
    pub fn finish(&mut self) -> &[usize] {
        while !self.complete {
            self.advance();
        }
        &self.tour
    }

    // (position in `unvisited`, city index, cost)
    fn nearest_unvisited(&self) -> Option<(usize, usize, u32)> {
        let mut best: Option<(usize, usize, u32)> = None;
        for (slot, &city) in self.unvisited.iter().enumerate() {
            let cost = self.matrix.cost(self.current, city);
            if best.map_or(true, |(_, _, best_cost)| cost < best_cost) {
                best = Some((slot, city, cost));
            }
        }
        best
    }

    /// City the tour started from.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// City the tour is currently at.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Cities not yet visited, ascending.
    #[must_use]
    pub fn unvisited(&self) -> &[usize] {
        &self.unvisited
    }

    /// Tour so far; closed tours end with `start` again.
    #[must_use]
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Sum of edge costs walked so far.
    #[must_use]
    pub const fn distance(&self) -> u64 {
        self.distance
    }

    /// Whether the tour has been closed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Matrix the session was opened against.
    #[must_use]
    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }
}

/// Build a complete nearest-neighbor tour in one go.
///
/// Returns `Ok(None)` for fewer than two cities.
///
/// # Errors
///
/// Returns `TourError::InvalidStartIndex` if `start` is not a city index.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tourviz::tour::{nearest_neighbor_tour, CostMatrix};
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 1, 4],
///     vec![1, 0, 2],
///     vec![4, 2, 0],
/// ]).unwrap();
/// let (tour, distance) = nearest_neighbor_tour(Arc::new(matrix), 0).unwrap().unwrap();
/// assert_eq!(tour, vec![0, 1, 2, 0]);
/// assert_eq!(distance, 7);
/// ```
pub fn nearest_neighbor_tour(
    matrix: Arc<CostMatrix>,
    start: usize,
) -> TourResult<Option<(Vec<usize>, u64)>> {
    Ok(SolveSession::begin(matrix, start)?.map(|mut session| {
        session.finish();
        (session.tour, session.distance)
    }))
}
