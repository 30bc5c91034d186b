//! Error types for tourviz.
//!
//! Every fallible operation returns `Result<T, TourError>` instead of
//! panicking. Solve-control errors carry enough context for a caller to
//! explain why a request was refused.

use thiserror::Error;

use crate::tour::SolveStatus;

/// Result type alias for tourviz operations.
pub type TourResult<T> = Result<T, TourError>;

/// Unified error type for all tourviz operations.
#[derive(Debug, Error)]
pub enum TourError {
    // ===== Solve Control =====
    /// Start index does not name an existing city.
    #[error("start index {index} is out of range for {city_count} cities")]
    InvalidStartIndex {
        /// Requested start index.
        index: usize,
        /// Number of cities at the time of the request.
        city_count: usize,
    },

    /// A tour needs at least two cities.
    #[error("at least 2 cities are required to solve, got {city_count}")]
    InsufficientCities {
        /// Number of cities at the time of the request.
        city_count: usize,
    },

    /// A solve session already exists.
    #[error("cannot start a new solve while the scheduler is {status}")]
    ConcurrentSolveAttempt {
        /// Scheduler status when `start()` was called.
        status: SolveStatus,
    },

    /// The city set cannot change while a session is running.
    #[error("cities cannot be edited while a solve is in progress")]
    SolveInProgress,

    // ===== City Set =====
    /// Every city name in the catalogue is already in use.
    #[error("city limit of {limit} reached")]
    CityLimitReached {
        /// Maximum number of cities.
        limit: usize,
    },

    /// Random generation count outside its bounds.
    #[error("city count {count} is outside {min}..={max}")]
    CityCountOutOfRange {
        /// Requested count.
        count: usize,
        /// Smallest allowed count.
        min: usize,
        /// Largest allowed count.
        max: usize,
    },

    /// City position is NaN or infinite.
    #[error("city position ({x}, {y}) is not finite")]
    NonFiniteCoordinate {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Two cities share a name.
    #[error("duplicate city name '{name}'")]
    DuplicateCityName {
        /// The repeated name.
        name: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TourError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Whether this error refuses a solve-control request (start/edit)
    /// rather than reporting bad input data.
    #[must_use]
    pub const fn is_solve_control(&self) -> bool {
        matches!(
            self,
            Self::InvalidStartIndex { .. }
                | Self::InsufficientCities { .. }
                | Self::ConcurrentSolveAttempt { .. }
                | Self::SolveInProgress
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_control_detection() {
        assert!(TourError::InvalidStartIndex {
            index: 5,
            city_count: 3
        }
        .is_solve_control());
        assert!(TourError::InsufficientCities { city_count: 1 }.is_solve_control());
        assert!(TourError::ConcurrentSolveAttempt {
            status: SolveStatus::Solving
        }
        .is_solve_control());
        assert!(TourError::SolveInProgress.is_solve_control());

        assert!(!TourError::config("bad").is_solve_control());
        assert!(!TourError::CityLimitReached { limit: 50 }.is_solve_control());
    }

    #[test]
    fn test_invalid_start_display() {
        let err = TourError::InvalidStartIndex {
            index: 7,
            city_count: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("start index 7"));
        assert!(msg.contains("4 cities"));
    }

    #[test]
    fn test_concurrent_display_names_status() {
        let err = TourError::ConcurrentSolveAttempt {
            status: SolveStatus::Paused,
        };
        assert!(err.to_string().contains("Paused"));
    }

    #[test]
    fn test_error_config() {
        let err = TourError::config("invalid parameter");
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("invalid parameter"));
    }

    #[test]
    fn test_error_serialization() {
        let err = TourError::serialization("failed to serialize");
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_range_display() {
        let err = TourError::CityCountOutOfRange {
            count: 60,
            min: 3,
            max: 50,
        };
        assert_eq!(err.to_string(), "city count 60 is outside 3..=50");
    }

    #[test]
    fn test_error_io_from() {
        let err: TourError = std::io::Error::other("disk gone").into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_debug() {
        let err = TourError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
