//! CLI command handlers.

use std::path::Path;
use std::process::ExitCode;

use tracing::debug;

use super::args::SolveOptions;
use super::output::{
    format_matrix, print_help, print_solve_json, print_solve_report, print_version, FrameRecord,
    SolveReport,
};
use super::{Args, Command};
use crate::config::VizConfig;
use crate::error::TourResult;
use crate::logging;
use crate::tour::{Board, StepFrame};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Solve {
            config_path,
            options,
        } => run_solve(&config_path, &options),
        Command::Matrix { config_path } => show_matrix(&config_path),
        Command::Validate { config_path } => validate_config(&config_path),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Load a configuration and apply command-line overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the overridden
/// configuration fails validation.
pub fn load_with_overrides(path: &Path, options: &SolveOptions) -> TourResult<VizConfig> {
    let mut config = VizConfig::load(path)?;
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    if let Some(start) = options.start {
        config.solver.start_city = Some(start);
    }
    if let Some(delay) = options.delay_ms {
        config.solver.step_delay_ms = delay;
    }
    config.check()?;
    Ok(config)
}

/// Build the board and drive it to completion on the virtual clock.
///
/// # Errors
///
/// Returns an error if the board cannot be built or the solve is rejected.
pub fn solve_config(config: &VizConfig) -> TourResult<SolveReport> {
    let mut board = Board::from_config(config)?;
    let mut frames: Vec<FrameRecord> = Vec::new();
    let mut record = |frame: &StepFrame<'_>| frames.push(FrameRecord::from(frame));

    let started = board.solve(&mut record)?;
    if started {
        board.run_until_settled(&mut record);
    } else {
        debug!(cities = board.cities().len(), "nothing to solve");
    }

    Ok(SolveReport::new(
        &board.view(),
        config.seed,
        board.start_city().unwrap_or(0),
        config.solver.step_delay_ms,
        frames,
    ))
}

/// Run the `solve` command.
#[must_use]
pub fn run_solve(path: &Path, options: &SolveOptions) -> ExitCode {
    let directive = if options.verbose {
        "tourviz=debug"
    } else {
        logging::DEFAULT_DIRECTIVE
    };
    logging::init_tracing(directive);

    let config = match load_with_overrides(path, options) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let report = match solve_config(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if options.json {
        if let Err(e) = print_solve_json(&report) {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    } else {
        print_solve_report(&report);
    }
    ExitCode::SUCCESS
}

/// Run the `matrix` command.
#[must_use]
pub fn show_matrix(path: &Path) -> ExitCode {
    let board = match VizConfig::load(path).and_then(|config| Board::from_config(&config)) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };
    print!("{}", format_matrix(board.cities(), board.matrix()));
    ExitCode::SUCCESS
}

/// Run the `validate` command.
#[must_use]
pub fn validate_config(path: &Path) -> ExitCode {
    println!("Validating: {}\n", path.display());
    match VizConfig::load(path) {
        Ok(config) => {
            println!("✓ Configuration valid");
            if config.cities.preset.is_empty() {
                println!(
                    "  {} random cities (seed {})",
                    config.cities.random_count, config.seed
                );
            } else {
                println!("  {} preset cities", config.cities.preset.len());
            }
            println!("  step delay {}ms", config.solver.step_delay_ms);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("✗ Configuration invalid");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
