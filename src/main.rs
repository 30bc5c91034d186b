//! tourviz CLI - step-by-step nearest-neighbor tours.
//!
//! All logic lives in `tourviz::cli` so it can be tested.

use std::process::ExitCode;

use tourviz::cli::{run_cli, Args};

fn main() -> ExitCode {
    run_cli(Args::parse())
}
