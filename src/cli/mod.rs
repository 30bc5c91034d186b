//! CLI module for tourviz.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, SolveOptions};
pub use commands::{load_with_overrides, run_cli, solve_config};
pub use output::{
    format_frame, format_matrix, print_help, print_solve_json, print_solve_report,
    print_version, CityRecord, FrameRecord, SolveReport,
};
