//! Configuration with YAML schema and validation.
//!
//! Mistakes are caught in three layers:
//! - Type-safe configuration structs (`deny_unknown_fields`)
//! - Declarative range checks via `validator`
//! - Semantic checks that span fields

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{TourError, TourResult};
use crate::tour::city::MAX_CITIES;
use crate::tour::scheduler::PausePolicy;

/// Smallest random city count the UI offers.
pub const MIN_RANDOM_CITIES: usize = 3;
/// Largest random city count the UI offers.
pub const MAX_RANDOM_CITIES: usize = MAX_CITIES;
/// Default delay between steps.
pub const DEFAULT_STEP_DELAY_MS: u64 = 50;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VizConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Seed for random city generation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Canvas the cities live on.
    #[validate(nested)]
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// City set settings.
    #[validate(nested)]
    #[serde(default)]
    pub cities: CitiesConfig,

    /// Solver and animation settings.
    #[validate(nested)]
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

const fn default_seed() -> u64 {
    42
}

impl VizConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> TourResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> TourResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> TourResult<String> {
        serde_yaml::to_string(self).map_err(|e| TourError::serialization(e.to_string()))
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn check(&self) -> TourResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> VizConfigBuilder {
        VizConfigBuilder::default()
    }

    /// Validate constraints that span fields.
    fn validate_semantic(&self) -> TourResult<()> {
        let canvas = &self.canvas;
        // Range checks pass NaN and infinity through.
        for (field, value) in [
            ("canvas.width", canvas.width),
            ("canvas.height", canvas.height),
            ("canvas.padding", canvas.padding),
            ("cities.pixels_per_unit", self.cities.pixels_per_unit),
        ] {
            if !value.is_finite() {
                return Err(TourError::config(format!("{field} must be finite, got {value}")));
            }
        }
        if canvas.width <= 2.0 * canvas.padding || canvas.height <= 2.0 * canvas.padding {
            return Err(TourError::config(format!(
                "canvas {}x{} leaves no room inside padding {}",
                canvas.width, canvas.height, canvas.padding
            )));
        }

        let preset = &self.cities.preset;
        if let Some(start) = self.solver.start_city {
            if !preset.is_empty() && start >= preset.len() {
                return Err(TourError::InvalidStartIndex {
                    index: start,
                    city_count: preset.len(),
                });
            }
        }

        let mut names = HashSet::new();
        for city in preset {
            if !(city.x.is_finite() && city.y.is_finite()) {
                return Err(TourError::NonFiniteCoordinate {
                    x: city.x,
                    y: city.y,
                });
            }
            if let Some(name) = &city.name {
                if !names.insert(name.as_str()) {
                    return Err(TourError::DuplicateCityName { name: name.clone() });
                }
            }
        }

        Ok(())
    }
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: default_seed(),
            canvas: CanvasConfig::default(),
            cities: CitiesConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct VizConfigBuilder {
    seed: Option<u64>,
    step_delay_ms: Option<u64>,
    start_city: Option<usize>,
    random_count: Option<usize>,
    pause_policy: Option<PausePolicy>,
    preset: Option<Vec<PresetCity>>,
}

impl VizConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the delay between steps.
    #[must_use]
    pub const fn step_delay_ms(mut self, millis: u64) -> Self {
        self.step_delay_ms = Some(millis);
        self
    }

    /// Set the start city.
    #[must_use]
    pub const fn start_city(mut self, index: usize) -> Self {
        self.start_city = Some(index);
        self
    }

    /// Set how many cities random generation places.
    #[must_use]
    pub const fn random_count(mut self, count: usize) -> Self {
        self.random_count = Some(count);
        self
    }

    /// Set the pause behaviour.
    #[must_use]
    pub const fn pause_policy(mut self, policy: PausePolicy) -> Self {
        self.pause_policy = Some(policy);
        self
    }

    /// Set an explicit city list.
    #[must_use]
    pub fn preset(mut self, cities: Vec<PresetCity>) -> Self {
        self.preset = Some(cities);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> VizConfig {
        let mut config = VizConfig::default();

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(millis) = self.step_delay_ms {
            config.solver.step_delay_ms = millis;
        }
        if self.start_city.is_some() {
            config.solver.start_city = self.start_city;
        }
        if let Some(count) = self.random_count {
            config.cities.random_count = count;
        }
        if let Some(policy) = self.pause_policy {
            config.solver.pause_policy = policy;
        }
        if let Some(preset) = self.preset {
            config.cities.preset = preset;
        }

        config
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CanvasConfig {
    /// Width in pixels.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_width")]
    pub width: f64,
    /// Height in pixels.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_height")]
    pub height: f64,
    /// Margin kept free of randomly placed cities.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_padding")]
    pub padding: f64,
}

const fn default_width() -> f64 {
    800.0
}

const fn default_height() -> f64 {
    600.0
}

const fn default_padding() -> f64 {
    30.0
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            padding: default_padding(),
        }
    }
}

/// City set settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CitiesConfig {
    /// Number of cities random generation places.
    #[validate(range(min = 3, max = 50))]
    #[serde(default = "default_random_count")]
    pub random_count: usize,

    /// Canvas pixels per distance unit.
    #[validate(range(min = 0.001))]
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f64,

    /// Explicit city list loaded instead of a random layout.
    #[validate(length(max = 50))]
    #[serde(default)]
    pub preset: Vec<PresetCity>,
}

const fn default_random_count() -> usize {
    10
}

const fn default_pixels_per_unit() -> f64 {
    crate::tour::distance::PIXELS_PER_UNIT
}

impl Default for CitiesConfig {
    fn default() -> Self {
        Self {
            random_count: default_random_count(),
            pixels_per_unit: default_pixels_per_unit(),
            preset: Vec::new(),
        }
    }
}

/// One city of a preset list. Unnamed cities get a catalogue name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetCity {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate.
    pub y: f64,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl PresetCity {
    /// Create a named preset city.
    #[must_use]
    pub fn named(x: f64, y: f64, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            name: Some(name.into()),
        }
    }
}

/// Solver and animation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// City the tour starts from; first city when unset.
    #[serde(default)]
    pub start_city: Option<usize>,

    /// Delay between steps in milliseconds.
    #[validate(range(min = 1, max = 10_000))]
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// What pausing does to the tick timer.
    #[serde(default)]
    pub pause_policy: PausePolicy,
}

const fn default_step_delay_ms() -> u64 {
    DEFAULT_STEP_DELAY_MS
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            start_city: None,
            step_delay_ms: default_step_delay_ms(),
            pause_policy: PausePolicy::default(),
        }
    }
}
