//! # tourviz
//!
//! Step-by-step nearest-neighbor construction of travelling-salesman tours.
//!
//! Cities are turned into a rounded integer cost matrix, a greedy builder
//! extends the tour one city per step, and a tick scheduler drives the
//! builder on a virtual clock with pause, resume and reset. Renderers read
//! the partial tour after every published step.
//!
//! ## Example
//!
//! ```rust
//! use tourviz::prelude::*;
//!
//! let config = VizConfig::builder()
//!     .preset(vec![
//!         PresetCity::named(0.0, 0.0, "A"),
//!         PresetCity::named(10.0, 0.0, "B"),
//!         PresetCity::named(10.0, 10.0, "C"),
//!         PresetCity::named(0.0, 10.0, "D"),
//!     ])
//!     .build();
//!
//! let mut board = Board::from_config(&config)?;
//! board.solve(&mut NullObserver)?;
//! board.run_until_settled(&mut NullObserver);
//!
//! assert_eq!(board.view().tour, &[0, 1, 2, 3, 0]);
//! assert_eq!(board.view().distance, 4);
//! # Ok::<(), TourError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop,
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod tour;

#[cfg(feature = "tui")]
pub mod tui;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{PresetCity, VizConfig, VizConfigBuilder};
    pub use crate::engine::{TickClock, TickTime, TourRng};
    pub use crate::error::{TourError, TourResult};
    pub use crate::tour::{
        nearest_neighbor_tour, Board, BoardView, City, CostMatrix, NullObserver, PausePolicy,
        Point, SolveSession, SolveStatus, StepFrame, StepOutcome, StepScheduler, TourObserver,
    };
}

/// Re-export for public API
pub use error::{TourError, TourResult};
