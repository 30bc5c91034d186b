//! TUI module for tourviz.
//!
//! Holds the testable app state driven by the `tourviz-tui` binary. The
//! terminal I/O stays in the binary.

pub mod tour_app;

pub use tour_app::{plot_to_canvas, TourApp};
