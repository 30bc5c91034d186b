//! Cities: labelled points on the canvas.
//!
//! A city is immutable once created. Names come from a fixed catalogue of
//! fifty, which also caps how many cities a board can hold.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::engine::TourRng;
use crate::error::{TourError, TourResult};

/// Names handed out to new cities.
pub const CITY_NAMES: [&str; 50] = [
    "Mumbai", "Delhi", "Bengaluru", "Kolkata", "Chennai", "Hyderabad", "Pune", "Ahmedabad",
    "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal", "Visakhapatnam",
    "Pimpri-Chinchwad", "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra", "Nashik",
    "Faridabad", "Meerut", "Rajkot", "Varanasi", "Srinagar", "Aurangabad", "Dhanbad",
    "Amritsar", "Navi Mumbai", "Allahabad", "Ranchi", "Howrah", "Coimbatore", "Jabalpur",
    "Gwalior", "Vijayawada", "Jodhpur", "Madurai", "Raipur", "Kota", "Guwahati", "Chandigarh",
    "Solapur", "Hubli-Dharwad", "Mysuru", "Tiruchirappalli", "Bareilly",
];

/// Most cities a board can hold: one per catalogue name.
pub const MAX_CITIES: usize = CITY_NAMES.len();

/// Position in canvas (pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A labelled point to be visited by the tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    position: Point,
    name: String,
}

impl City {
    /// Create a city.
    ///
    /// # Errors
    ///
    /// Returns `TourError::NonFiniteCoordinate` if either coordinate is NaN
    /// or infinite.
    pub fn new(position: Point, name: impl Into<String>) -> TourResult<Self> {
        if !position.is_finite() {
            return Err(TourError::NonFiniteCoordinate {
                x: position.x,
                y: position.y,
            });
        }
        Ok(Self {
            position,
            name: name.into(),
        })
    }

    /// Canvas position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Full name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First three characters of the name, used as matrix headers.
    #[must_use]
    pub fn short_name(&self) -> String {
        self.name.chars().take(3).collect()
    }
}

/// Pick a random catalogue name not used by any of `cities`.
///
/// Returns `None` once every name is taken.
#[must_use]
pub fn pick_unused_name(cities: &[City], rng: &mut TourRng) -> Option<&'static str> {
    let used: HashSet<&str> = cities.iter().map(City::name).collect();
    let available: Vec<&'static str> = CITY_NAMES
        .iter()
        .copied()
        .filter(|name| !used.contains(name))
        .collect();
    rng.gen_index(available.len()).map(|i| available[i])
}

/// The first `count` names of a shuffled catalogue.
#[must_use]
pub fn shuffled_names(count: usize, rng: &mut TourRng) -> Vec<&'static str> {
    let mut names = CITY_NAMES;
    rng.shuffle(&mut names);
    names.into_iter().take(count).collect()
}

/// Check that no two cities share a name.
///
/// # Errors
///
/// Returns `TourError::DuplicateCityName` naming the first repeat.
pub fn ensure_unique_names(cities: &[City]) -> TourResult<()> {
    let mut seen = HashSet::with_capacity(cities.len());
    for city in cities {
        if !seen.insert(city.name()) {
            return Err(TourError::DuplicateCityName {
                name: city.name().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn city(x: f64, y: f64, name: &str) -> City {
        City::new(Point::new(x, y), name).expect("finite city")
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_city_rejects_nan() {
        let err = City::new(Point::new(f64::NAN, 1.0), "Bad");
        assert!(matches!(err, Err(TourError::NonFiniteCoordinate { .. })));
    }

    #[test]
    fn test_city_rejects_infinity() {
        let err = City::new(Point::new(1.0, f64::INFINITY), "Bad");
        assert!(matches!(err, Err(TourError::NonFiniteCoordinate { .. })));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(city(0.0, 0.0, "Mumbai").short_name(), "Mum");
        assert_eq!(city(0.0, 0.0, "A").short_name(), "A");
    }

    #[test]
    fn test_catalogue_names_unique() {
        let unique: HashSet<&str> = CITY_NAMES.iter().copied().collect();
        assert_eq!(unique.len(), MAX_CITIES);
    }

    #[test]
    fn test_pick_unused_name_skips_used() {
        let mut rng = TourRng::new(3);
        let cities: Vec<City> = CITY_NAMES[..49]
            .iter()
            .map(|n| city(0.0, 0.0, n))
            .collect();
        assert_eq!(pick_unused_name(&cities, &mut rng), Some(CITY_NAMES[49]));
    }

    #[test]
    fn test_pick_unused_name_exhausted() {
        let mut rng = TourRng::new(3);
        let cities: Vec<City> = CITY_NAMES.iter().map(|n| city(0.0, 0.0, n)).collect();
        assert_eq!(pick_unused_name(&cities, &mut rng), None);
    }

    #[test]
    fn test_shuffled_names_unique_and_sized() {
        let mut rng = TourRng::new(11);
        let names = shuffled_names(20, &mut rng);
        assert_eq!(names.len(), 20);
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_ensure_unique_names() {
        let ok = vec![city(0.0, 0.0, "A"), city(1.0, 1.0, "B")];
        assert!(ensure_unique_names(&ok).is_ok());

        let dup = vec![city(0.0, 0.0, "A"), city(1.0, 1.0, "A")];
        match ensure_unique_names(&dup) {
            Err(TourError::DuplicateCityName { name }) => assert_eq!(name, "A"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }
}
