//! CLI output formatting.
//!
//! Formatters return strings so they can be tested; the `print_*`
//! wrappers write them to stdout.

use std::fmt::Write as _;

use serde::Serialize;

use crate::tour::{BoardView, City, CostMatrix, SolveStatus, StepFrame, StepOutcome};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!("tourviz {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"tourviz - Step-by-step nearest-neighbor TSP tours

USAGE:
    tourviz <COMMAND> [OPTIONS]

COMMANDS:
    solve <config.yaml>         Solve the configured cities step by step
        --seed <N>              Override the random layout seed
        --start <N>             Start city index (default: first city)
        --delay <MS>            Delay between steps on the virtual clock
        --json                  Print a JSON report
        -v, --verbose           Log every step

    matrix <config.yaml>        Print the cost matrix

    validate <config.yaml>      Validate a configuration file

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    tourviz solve experiments/square_four.yaml
    tourviz solve experiments/random_twenty.yaml --seed 7 --start 3
    tourviz matrix experiments/square_four.yaml

LOGGING:
    Set RUST_LOG (e.g. RUST_LOG=tourviz=debug) to control log output.
"
    );
}

/// One published frame, owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    /// Steps performed when the frame was published.
    pub step: u64,
    /// Engine time in milliseconds.
    pub time_ms: u64,
    /// Tour so far.
    pub tour: Vec<usize>,
    /// Running distance.
    pub distance: u64,
    /// Scheduler state.
    pub status: SolveStatus,
    /// Step that produced the frame.
    pub outcome: Option<StepOutcome>,
}

impl From<&StepFrame<'_>> for FrameRecord {
    fn from(frame: &StepFrame<'_>) -> Self {
        Self {
            step: frame.step,
            time_ms: frame.time.as_millis(),
            tour: frame.tour.to_vec(),
            distance: frame.distance,
            status: frame.status,
            outcome: frame.outcome,
        }
    }
}

/// City as it appears in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRecord {
    /// Index in the city list.
    pub index: usize,
    /// Full name.
    pub name: String,
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate.
    pub y: f64,
}

/// Everything a `solve` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// Seed the board was built with.
    pub seed: u64,
    /// Start city.
    pub start: usize,
    /// Delay between steps.
    pub step_delay_ms: u64,
    /// Cities in index order.
    pub cities: Vec<CityRecord>,
    /// Final tour.
    pub tour: Vec<usize>,
    /// Final tour by city name.
    pub tour_names: Vec<String>,
    /// Final distance.
    pub distance: u64,
    /// Final state.
    pub status: SolveStatus,
    /// Every published frame.
    pub frames: Vec<FrameRecord>,
}

impl SolveReport {
    /// Collect a report from a settled board.
    #[must_use]
    pub fn new(
        view: &BoardView<'_>,
        seed: u64,
        start: usize,
        step_delay_ms: u64,
        frames: Vec<FrameRecord>,
    ) -> Self {
        Self {
            seed,
            start,
            step_delay_ms,
            cities: view
                .cities
                .iter()
                .enumerate()
                .map(|(index, city)| CityRecord {
                    index,
                    name: city.name().to_string(),
                    x: city.position().x,
                    y: city.position().y,
                })
                .collect(),
            tour: view.tour.to_vec(),
            tour_names: tour_names(view.cities, view.tour),
            distance: view.distance,
            status: view.status,
            frames,
        }
    }
}

fn tour_names(cities: &[City], tour: &[usize]) -> Vec<String> {
    tour.iter()
        .filter_map(|&i| cities.get(i).map(|c| c.name().to_string()))
        .collect()
}

/// Format the cost matrix as a table headed by three-letter names.
///
/// Diagonal cells are bracketed.
#[must_use]
pub fn format_matrix(cities: &[City], matrix: &CostMatrix) -> String {
    let mut out = String::new();
    if matrix.is_empty() {
        out.push_str("(no cities)\n");
        return out;
    }

    let headers: Vec<String> = cities.iter().map(City::short_name).collect();
    let _ = write!(out, "{:>5}", "");
    for header in &headers {
        let _ = write!(out, " {header:>5}");
    }
    out.push('\n');

    for (i, row) in matrix.rows().iter().enumerate() {
        let label = headers.get(i).map_or("?", String::as_str);
        let _ = write!(out, "{label:>5}");
        for (j, cost) in row.iter().enumerate() {
            if i == j {
                let _ = write!(out, " {:>5}", format!("[{cost}]"));
            } else {
                let _ = write!(out, " {cost:>5}");
            }
        }
        out.push('\n');
    }
    out
}

/// Format one published frame as a single line.
#[must_use]
pub fn format_frame(frame: &FrameRecord, cities: &[CityRecord]) -> String {
    let name_of = |i: usize| cities.get(i).map_or("?", |c| c.name.as_str());
    let names = frame
        .tour
        .iter()
        .map(|&i| name_of(i))
        .collect::<Vec<_>>()
        .join(" → ");
    let detail = match frame.outcome {
        None => "start".to_string(),
        Some(StepOutcome::Visited { city, edge_cost }) => {
            let name = name_of(city);
            format!("visit {name} (+{edge_cost})")
        }
        Some(StepOutcome::Closed { edge_cost }) => format!("close loop (+{edge_cost})"),
        Some(StepOutcome::AlreadyComplete) => "complete".to_string(),
    };
    format!(
        "[{:>6}ms] step {:>2}  {:<22} distance {:>5}  {}",
        frame.time_ms, frame.step, detail, frame.distance, names
    )
}

/// Print a text report.
pub fn print_solve_report(report: &SolveReport) {
    println!("{RULE}");
    println!("Cities: {}", report.cities.len());
    println!("Seed:   {}", report.seed);
    println!("Start:  {}", start_name(report));
    println!("Delay:  {}ms", report.step_delay_ms);
    println!("{RULE}\n");

    for frame in &report.frames {
        println!("{}", format_frame(frame, &report.cities));
    }

    println!("\n{RULE}");
    println!("Status:   {}", report.status.label());
    println!("Tour:     {}", report.tour_names.join(" → "));
    println!("Distance: {}", report.distance);
    println!("{RULE}");
}

fn start_name(report: &SolveReport) -> String {
    report.cities.get(report.start).map_or_else(
        || report.start.to_string(),
        |c| format!("{} ({})", c.name, c.index),
    )
}

/// Print a JSON report.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_solve_json(report: &SolveReport) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
