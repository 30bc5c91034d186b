//! Nearest-neighbor tour construction.
//!
//! Leaf first:
//! - [`city`]: labelled points and the name catalogue
//! - [`distance`]: cities to a rounded integer cost matrix
//! - [`nearest`]: the greedy builder, one step at a time
//! - [`scheduler`]: tick-driven animation with pause and reset
//! - [`board`]: cities, matrix and scheduler held together

pub mod board;
pub mod city;
pub mod distance;
pub mod nearest;
pub mod scheduler;

pub use board::{Board, BoardView};
pub use city::{City, Point, CITY_NAMES, MAX_CITIES};
pub use distance::{CostMatrix, PIXELS_PER_UNIT};
pub use nearest::{nearest_neighbor_tour, SolveSession, StepOutcome};
pub use scheduler::{
    NullObserver, PausePolicy, SolveStatus, StepFrame, StepScheduler, TourObserver, TourSnapshot,
};
