//! Distance model: city positions to a symmetric integer cost matrix.
//!
//! Entry `(i, j)` is the pixel distance between two cities divided by the
//! pixels-per-unit scale and rounded to the nearest integer. The diagonal is
//! zero. A matrix is never patched: any change to the city set builds a new
//! one.

use serde::{Deserialize, Serialize};

use crate::error::{TourError, TourResult};
use crate::tour::city::City;

/// Default canvas pixels per distance unit.
pub const PIXELS_PER_UNIT: f64 = 10.0;

/// Square matrix of rounded pairwise distances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostMatrix {
    costs: Vec<Vec<u32>>,
}

impl CostMatrix {
    /// Matrix with no cities.
    #[must_use]
    pub const fn empty() -> Self {
        Self { costs: Vec::new() }
    }

    /// Build the matrix at the default scale.
    #[must_use]
    pub fn from_cities(cities: &[City]) -> Self {
        Self::build(cities, PIXELS_PER_UNIT)
    }

    /// Build the matrix with a custom pixels-per-unit scale.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Config` if the scale is not a positive finite
    /// number.
    pub fn from_cities_scaled(cities: &[City], pixels_per_unit: f64) -> TourResult<Self> {
        if !(pixels_per_unit.is_finite() && pixels_per_unit > 0.0) {
            return Err(TourError::config(format!(
                "pixels_per_unit must be positive and finite, got {pixels_per_unit}"
            )));
        }
        Ok(Self::build(cities, pixels_per_unit))
    }

    /// Wrap precomputed rows.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Config` if the rows do not form a square matrix
    /// with a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> TourResult<Self> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(TourError::config(format!(
                    "cost matrix row {i} has {} columns, expected {n}",
                    row.len()
                )));
            }
            if row[i] != 0 {
                return Err(TourError::config(format!(
                    "cost matrix diagonal ({i},{i}) is {}, expected 0",
                    row[i]
                )));
            }
        }
        Ok(Self { costs: rows })
    }

    /// Build without checking the scale; callers hold a validated one.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn build(cities: &[City], pixels_per_unit: f64) -> Self {
        let n = cities.len();
        let mut costs = vec![vec![0u32; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let pixels = cities[i].position().distance_to(&cities[j].position());
                let cost = (pixels / pixels_per_unit).round() as u32;
                costs[i][j] = cost;
                costs[j][i] = cost;
            }
        }
        Self { costs }
    }

    /// Number of cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Whether the matrix has no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Cost from `from` to `to`.
    ///
    /// Indices must be below [`len`](Self::len).
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u32 {
        self.costs[from][to]
    }

    /// Cost from `from` to `to`, or `None` when either index is out of range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<u32> {
        self.costs.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Matrix rows, for display.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u32>] {
        &self.costs
    }

    /// Whether `cost(i, j) == cost(j, i)` everywhere.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| ((i + 1)..n).all(|j| self.costs[i][j] == self.costs[j][i]))
    }

    /// Sum of edge costs over consecutive pairs of `tour`.
    ///
    /// A closed tour repeats its first index at the end, so the closing edge
    /// is counted exactly when it is present.
    #[must_use]
    pub fn tour_cost(&self, tour: &[usize]) -> u64 {
        tour.windows(2)
            .map(|pair| u64::from(self.cost(pair[0], pair[1])))
            .sum()
    }
}
