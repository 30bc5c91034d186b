//! Board: the cities, their cost matrix and the scheduler solving them.
//!
//! The board is the only writer. Renderers take a [`BoardView`] after each
//! publish and read from it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{CanvasConfig, VizConfig, MAX_RANDOM_CITIES, MIN_RANDOM_CITIES};
use crate::engine::TourRng;
use crate::error::{TourError, TourResult};
use crate::tour::city::{
    ensure_unique_names, pick_unused_name, shuffled_names, City, Point, MAX_CITIES,
};
use crate::tour::distance::CostMatrix;
use crate::tour::scheduler::{SolveStatus, StepScheduler, TourObserver};

/// City set plus the solver working on it.
#[derive(Debug)]
pub struct Board {
    cities: Vec<City>,
    matrix: Arc<CostMatrix>,
    pixels_per_unit: f64,
    canvas: CanvasConfig,
    start_city: Option<usize>,
    scheduler: StepScheduler,
    rng: TourRng,
}

impl Board {
    /// Build a board from configuration.
    ///
    /// A preset city list is loaded as given, with catalogue names for
    /// unnamed entries. Without a preset, `cities.random_count` cities are
    /// generated.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &VizConfig) -> TourResult<Self> {
        config.check()?;

        let mut board = Self {
            cities: Vec::new(),
            matrix: Arc::new(CostMatrix::from_cities_scaled(
                &[],
                config.cities.pixels_per_unit,
            )?),
            pixels_per_unit: config.cities.pixels_per_unit,
            canvas: config.canvas.clone(),
            start_city: None,
            scheduler: StepScheduler::new(
                config.solver.step_delay_ms,
                config.solver.pause_policy,
            )?,
            rng: TourRng::new(config.seed),
        };

        if config.cities.preset.is_empty() {
            board.generate_random(config.cities.random_count)?;
        } else {
            let mut cities: Vec<City> = Vec::with_capacity(config.cities.preset.len());
            // Named entries first claim their names, then the rest draw from
            // what is left of the catalogue.
            let mut claimed: Vec<City> = config
                .cities
                .preset
                .iter()
                .filter_map(|p| p.name.as_ref())
                .map(|name| City::new(Point::default(), name.clone()))
                .collect::<TourResult<_>>()?;
            for preset in &config.cities.preset {
                let name = match &preset.name {
                    Some(name) => name.clone(),
                    None => {
                        let name = pick_unused_name(&claimed, &mut board.rng).ok_or(
                            TourError::CityLimitReached { limit: MAX_CITIES },
                        )?;
                        claimed.push(City::new(Point::default(), name)?);
                        name.to_string()
                    }
                };
                cities.push(City::new(Point::new(preset.x, preset.y), name)?);
            }
            board.replace_cities(cities)?;
        }

        board.start_city = config.solver.start_city;
        if let Some(start) = board.start_city {
            board.check_start(start)?;
        }
        Ok(board)
    }

    /// Add a city at `position` with an unused catalogue name.
    ///
    /// Returns the new city's index. Any finished tour is cleared.
    ///
    /// # Errors
    ///
    /// - `SolveInProgress` while Solving or Paused
    /// - `CityLimitReached` when the board is full
    /// - `NonFiniteCoordinate` for NaN or infinite positions
    pub fn add_city(&mut self, position: Point) -> TourResult<usize> {
        self.ensure_editable()?;
        if self.cities.len() >= MAX_CITIES {
            return Err(TourError::CityLimitReached { limit: MAX_CITIES });
        }
        let name = pick_unused_name(&self.cities, &mut self.rng)
            .ok_or(TourError::CityLimitReached { limit: MAX_CITIES })?;
        let city = City::new(position, name)?;

        self.cities.push(city);
        self.cities_changed();
        debug!(name, x = position.x, y = position.y, "city added");
        Ok(self.cities.len() - 1)
    }

    /// Replace every city with `count` random ones inside the canvas padding.
    ///
    /// The selected start city is cleared.
    ///
    /// # Errors
    ///
    /// - `SolveInProgress` while Solving or Paused
    /// - `CityCountOutOfRange` unless `count` is within 3..=50
    pub fn generate_random(&mut self, count: usize) -> TourResult<()> {
        self.ensure_editable()?;
        if !(MIN_RANDOM_CITIES..=MAX_RANDOM_CITIES).contains(&count) {
            return Err(TourError::CityCountOutOfRange {
                count,
                min: MIN_RANDOM_CITIES,
                max: MAX_RANDOM_CITIES,
            });
        }

        let pad = self.canvas.padding;
        let (width, height) = (self.canvas.width, self.canvas.height);
        let names = shuffled_names(count, &mut self.rng);
        let mut cities = Vec::with_capacity(count);
        for name in names {
            let x = self.rng.gen_range_f64(pad, width - pad)?;
            let y = self.rng.gen_range_f64(pad, height - pad)?;
            cities.push(City::new(Point::new(x, y), name)?);
        }

        self.cities = cities;
        self.start_city = None;
        self.cities_changed();
        info!(count, seed = self.rng.seed(), "random cities generated");
        Ok(())
    }

    /// Replace the city list with a fresh snapshot.
    ///
    /// # Errors
    ///
    /// - `SolveInProgress` while Solving or Paused
    /// - `CityLimitReached` for more than 50 cities
    /// - `DuplicateCityName` if two cities share a name
    pub fn replace_cities(&mut self, cities: Vec<City>) -> TourResult<()> {
        self.ensure_editable()?;
        if cities.len() > MAX_CITIES {
            return Err(TourError::CityLimitReached { limit: MAX_CITIES });
        }
        ensure_unique_names(&cities)?;

        self.cities = cities;
        if self.start_city.is_some_and(|s| s >= self.cities.len()) {
            self.start_city = None;
        }
        self.cities_changed();
        Ok(())
    }

    /// Remove every city and abandon any session. Allowed in any state.
    pub fn clear(&mut self) {
        self.scheduler.reset();
        self.cities.clear();
        self.start_city = None;
        self.matrix = Arc::new(CostMatrix::empty());
        debug!("board cleared");
    }

    /// Select the start city; `None` means the first city.
    ///
    /// # Errors
    ///
    /// - `SolveInProgress` while Solving or Paused
    /// - `InvalidStartIndex` if the index is not a city
    pub fn set_start_city(&mut self, start: Option<usize>) -> TourResult<()> {
        self.ensure_editable()?;
        if let Some(index) = start {
            self.check_start(index)?;
        }
        self.start_city = start;
        Ok(())
    }

    /// Start solving from the selected start city.
    ///
    /// Returns `Ok(false)` without starting when there are fewer than two
    /// cities.
    ///
    /// # Errors
    ///
    /// - `ConcurrentSolveAttempt` while Solving or Paused
    /// - `InvalidStartIndex` if the selected start is stale
    pub fn solve(&mut self, observer: &mut impl TourObserver) -> TourResult<bool> {
        let start = self.start_city.unwrap_or(0);
        match self
            .scheduler
            .start(Arc::clone(&self.matrix), start, observer)
        {
            Ok(()) => Ok(true),
            Err(TourError::InsufficientCities { city_count }) => {
                debug!(city_count, "solve ignored: not enough cities");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Pause a running solve.
    pub fn pause(&mut self) -> bool {
        self.scheduler.pause()
    }

    /// Resume a paused solve.
    pub fn resume(&mut self) -> bool {
        self.scheduler.resume()
    }

    /// Pause or resume.
    pub fn toggle_pause(&mut self) -> bool {
        self.scheduler.toggle_pause()
    }

    /// Abandon the current solve and clear the tour, keeping the cities.
    pub fn reset(&mut self) {
        self.scheduler.reset();
    }

    /// Let `elapsed_ms` of engine time pass. Returns ticks fired.
    pub fn advance_time(&mut self, elapsed_ms: u64, observer: &mut impl TourObserver) -> usize {
        self.scheduler.advance_time(elapsed_ms, observer)
    }

    /// Fire ticks until the solve completes or pauses.
    pub fn run_until_settled(&mut self, observer: &mut impl TourObserver) -> usize {
        self.scheduler.run_until_settled(observer)
    }

    /// Change the delay between steps.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Config` for a zero delay.
    pub fn set_step_delay(&mut self, millis: u64) -> TourResult<()> {
        self.scheduler.set_step_delay(millis)
    }

    /// Cities in index order.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Current cost matrix.
    #[must_use]
    pub fn matrix(&self) -> &Arc<CostMatrix> {
        &self.matrix
    }

    /// Canvas the cities live on.
    #[must_use]
    pub const fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Selected start city.
    #[must_use]
    pub const fn start_city(&self) -> Option<usize> {
        self.start_city
    }

    /// The scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &StepScheduler {
        &self.scheduler
    }

    /// Scheduler state.
    #[must_use]
    pub const fn status(&self) -> SolveStatus {
        self.scheduler.status()
    }

    /// Read-only view for renderers.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        let tour = self.scheduler.tour();
        BoardView {
            cities: &self.cities,
            matrix: &self.matrix,
            tour,
            distance: self.scheduler.distance(),
            status: self.scheduler.status(),
            tour_start: tour.first().copied(),
            selected_start: self.start_city,
        }
    }

    fn ensure_editable(&self) -> TourResult<()> {
        if self.scheduler.status().is_active() {
            return Err(TourError::SolveInProgress);
        }
        Ok(())
    }

    fn check_start(&self, index: usize) -> TourResult<()> {
        if index >= self.cities.len() {
            return Err(TourError::InvalidStartIndex {
                index,
                city_count: self.cities.len(),
            });
        }
        Ok(())
    }

    fn cities_changed(&mut self) {
        self.scheduler.reset();
        self.matrix = Arc::new(CostMatrix::build(&self.cities, self.pixels_per_unit));
    }
}

/// What a renderer reads after each publish.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    /// Cities in index order.
    pub cities: &'a [City],
    /// Current cost matrix.
    pub matrix: &'a CostMatrix,
    /// Tour so far, length 0..=N+1.
    pub tour: &'a [usize],
    /// Running distance.
    pub distance: u64,
    /// Scheduler state.
    pub status: SolveStatus,
    /// First city of the tour being drawn.
    pub tour_start: Option<usize>,
    /// City the user selected as start.
    pub selected_start: Option<usize>,
}

impl BoardView<'_> {
    /// Status readout text.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        self.status.label()
    }

    /// Positions along the tour, for drawing edges.
    pub fn tour_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.tour
            .iter()
            .filter_map(|&i| self.cities.get(i).map(City::position))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::PresetCity;
    use crate::tour::scheduler::NullObserver;
    use std::collections::HashSet;

    fn square_config() -> VizConfig {
        VizConfig::builder()
            .preset(vec![
                PresetCity::named(0.0, 0.0, "A"),
                PresetCity::named(10.0, 0.0, "B"),
                PresetCity::named(10.0, 10.0, "C"),
                PresetCity::named(0.0, 10.0, "D"),
            ])
            .build()
    }

    fn square() -> Board {
        Board::from_config(&square_config()).expect("valid config")
    }

    #[test]
    fn test_from_config_preset() {
        let board = square();
        assert_eq!(board.cities().len(), 4);
        assert_eq!(board.cities()[2].name(), "C");
        assert_eq!(board.matrix().len(), 4);
        assert_eq!(board.status(), SolveStatus::Idle);
    }

    #[test]
    fn test_from_config_random() {
        let config = VizConfig::builder().random_count(12).seed(9).build();
        let board = Board::from_config(&config).expect("valid");
        assert_eq!(board.cities().len(), 12);

        let again = Board::from_config(&config).expect("valid");
        assert_eq!(board.cities(), again.cities());
    }

    #[test]
    fn test_infinite_scale_never_reaches_matrix() {
        let mut config = square_config();
        config.cities.pixels_per_unit = f64::INFINITY;
        assert!(matches!(
            Board::from_config(&config),
            Err(TourError::Config { .. })
        ));
    }

    #[test]
    fn test_unnamed_preset_gets_unused_name() {
        let config = VizConfig::builder()
            .preset(vec![
                PresetCity::named(0.0, 0.0, "Mumbai"),
                PresetCity {
                    x: 5.0,
                    y: 5.0,
                    name: None,
                },
            ])
            .build();
        let board = Board::from_config(&config).expect("valid");
        assert_eq!(board.cities()[0].name(), "Mumbai");
        assert_ne!(board.cities()[1].name(), "Mumbai");
    }

    #[test]
    fn test_solve_square() {
        let mut board = square();
        assert!(board.solve(&mut NullObserver).expect("solve"));
        board.run_until_settled(&mut NullObserver);

        let view = board.view();
        assert_eq!(view.tour, &[0, 1, 2, 3, 0]);
        assert_eq!(view.distance, 4);
        assert_eq!(view.status_label(), "Complete");
        assert_eq!(view.tour_start, Some(0));
    }

    #[test]
    fn test_solve_uses_selected_start() {
        let mut board = square();
        board.set_start_city(Some(2)).expect("valid");
        board.solve(&mut NullObserver).expect("solve");
        board.run_until_settled(&mut NullObserver);
        let view = board.view();
        assert_eq!(view.tour.first(), Some(&2));
        assert_eq!(view.tour.last(), Some(&2));
        assert_eq!(view.selected_start, Some(2));
    }

    #[test]
    fn test_solve_with_too_few_cities_is_noop() {
        let mut board = square();
        board.clear();
        assert!(!board.solve(&mut NullObserver).expect("no-op"));
        assert_eq!(board.status(), SolveStatus::Idle);

        board.add_city(Point::new(1.0, 1.0)).expect("add");
        assert!(!board.solve(&mut NullObserver).expect("no-op"));
        let view = board.view();
        assert!(view.tour.is_empty());
        assert_eq!(view.distance, 0);
    }

    #[test]
    fn test_edits_rejected_while_solving() {
        let mut board = square();
        board.solve(&mut NullObserver).expect("solve");
        assert!(matches!(
            board.add_city(Point::new(1.0, 1.0)),
            Err(TourError::SolveInProgress)
        ));
        assert!(matches!(
            board.generate_random(5),
            Err(TourError::SolveInProgress)
        ));
        assert!(matches!(
            board.set_start_city(Some(1)),
            Err(TourError::SolveInProgress)
        ));
        board.pause();
        assert!(matches!(
            board.add_city(Point::new(1.0, 1.0)),
            Err(TourError::SolveInProgress)
        ));
    }

    #[test]
    fn test_add_city_clears_finished_tour() {
        let mut board = square();
        board.solve(&mut NullObserver).expect("solve");
        board.run_until_settled(&mut NullObserver);

        let index = board.add_city(Point::new(50.0, 50.0)).expect("add");
        assert_eq!(index, 4);
        assert_eq!(board.status(), SolveStatus::Idle);
        assert!(board.view().tour.is_empty());
        assert_eq!(board.matrix().len(), 5);
        assert_eq!(board.matrix().cost(0, 4), 7);
    }

    #[test]
    fn test_add_city_limit() {
        let mut board = square();
        board.clear();
        for i in 0..MAX_CITIES {
            #[allow(clippy::cast_precision_loss)]
            board.add_city(Point::new(i as f64, 0.0)).expect("room");
        }
        let names: HashSet<&str> = board.cities().iter().map(City::name).collect();
        assert_eq!(names.len(), MAX_CITIES);
        assert!(matches!(
            board.add_city(Point::new(0.0, 0.0)),
            Err(TourError::CityLimitReached { limit: 50 })
        ));
    }

    #[test]
    fn test_generate_random_bounds() {
        let mut board = square();
        assert!(matches!(
            board.generate_random(2),
            Err(TourError::CityCountOutOfRange { count: 2, .. })
        ));
        assert!(matches!(
            board.generate_random(51),
            Err(TourError::CityCountOutOfRange { count: 51, .. })
        ));

        board.set_start_city(Some(3)).expect("valid");
        board.generate_random(20).expect("in range");
        assert_eq!(board.cities().len(), 20);
        assert_eq!(board.start_city(), None);
        for city in board.cities() {
            let p = city.position();
            assert!((30.0..770.0).contains(&p.x));
            assert!((30.0..570.0).contains(&p.y));
        }
    }

    #[test]
    fn test_clear_mid_solve() {
        let mut board = square();
        board.solve(&mut NullObserver).expect("solve");
        board.advance_time(0, &mut NullObserver);
        board.clear();

        assert_eq!(board.status(), SolveStatus::Idle);
        assert!(board.cities().is_empty());
        assert!(board.matrix().is_empty());
        assert_eq!(board.advance_time(1_000, &mut NullObserver), 0);
    }

    #[test]
    fn test_set_start_city_validated() {
        let mut board = square();
        assert!(matches!(
            board.set_start_city(Some(4)),
            Err(TourError::InvalidStartIndex {
                index: 4,
                city_count: 4
            })
        ));
        board.set_start_city(None).expect("clear");
        assert_eq!(board.start_city(), None);
    }

    #[test]
    fn test_replace_cities_rejects_duplicates() {
        let mut board = square();
        let dup = vec![
            City::new(Point::new(0.0, 0.0), "X").expect("finite"),
            City::new(Point::new(1.0, 0.0), "X").expect("finite"),
        ];
        assert!(matches!(
            board.replace_cities(dup),
            Err(TourError::DuplicateCityName { .. })
        ));
        assert_eq!(board.cities().len(), 4);
    }

    #[test]
    fn test_replace_cities_drops_stale_start() {
        let mut board = square();
        board.set_start_city(Some(3)).expect("valid");
        let two = vec![
            City::new(Point::new(0.0, 0.0), "X").expect("finite"),
            City::new(Point::new(1.0, 0.0), "Y").expect("finite"),
        ];
        board.replace_cities(two).expect("replace");
        assert_eq!(board.start_city(), None);
    }

    #[test]
    fn test_view_tour_points() {
        let mut board = square();
        board.solve(&mut NullObserver).expect("solve");
        board.advance_time(0, &mut NullObserver);
        let points: Vec<Point> = board.view().tour_points().collect();
        assert_eq!(points, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }
}
