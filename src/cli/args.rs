//! CLI argument parsing.
//!
//! Hand-rolled so the parser can be driven from any string iterator in
//! tests.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Overrides applied on top of a loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// Seed for random city generation.
    pub seed: Option<u64>,
    /// Start city index.
    pub start: Option<usize>,
    /// Delay between steps in milliseconds.
    pub delay_ms: Option<u64>,
    /// Print a JSON report instead of text.
    pub json: bool,
    /// Log every step.
    pub verbose: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Solve the cities of a configuration, printing every step
    Solve {
        /// Path to the configuration YAML file.
        config_path: PathBuf,
        /// Command-line overrides.
        options: SolveOptions,
    },
    /// Print the cost matrix of a configuration
    Matrix {
        /// Path to the configuration YAML file.
        config_path: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        /// Path to the configuration YAML file.
        config_path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "solve" => Self::parse_solve_command(args),
            "matrix" => Self::parse_path_command(args, "matrix")
                .map_or(Command::Help, |config_path| Command::Matrix { config_path }),
            "validate" => Self::parse_path_command(args, "validate")
                .map_or(Command::Help, |config_path| Command::Validate { config_path }),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn parse_path_command(args: &[String], name: &str) -> Option<PathBuf> {
        if args.len() < 3 {
            eprintln!("Error: '{name}' command requires a config path");
            return None;
        }
        Some(PathBuf::from(&args[2]))
    }

    fn parse_solve_command(args: &[String]) -> Command {
        let Some(config_path) = Self::parse_path_command(args, "solve") else {
            return Command::Help;
        };

        let mut options = SolveOptions::default();
        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    options.seed = parse_value(args, i, "--seed");
                    i += 2;
                }
                "--start" => {
                    options.start = parse_value(args, i, "--start");
                    i += 2;
                }
                "--delay" => {
                    options.delay_ms = parse_value(args, i, "--delay");
                    i += 2;
                }
                "--json" => {
                    options.json = true;
                    i += 1;
                }
                "-v" | "--verbose" => {
                    options.verbose = true;
                    i += 1;
                }
                other => {
                    eprintln!("Warning: ignoring unknown option {other}");
                    i += 1;
                }
            }
        }

        Command::Solve {
            config_path,
            options,
        }
    }
}

fn parse_value<T: std::str::FromStr>(args: &[String], flag_index: usize, flag: &str) -> Option<T> {
    let Some(raw) = args.get(flag_index + 1) else {
        eprintln!("Error: {flag} requires a value");
        return None;
    };
    raw.parse().ok().or_else(|| {
        eprintln!("Error: invalid value for {flag}: {raw}");
        None
    })
}
