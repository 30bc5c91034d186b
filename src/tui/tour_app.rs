//! Terminal app state for the tour visualizer.
//!
//! Terminal I/O lives in the `tourviz-tui` binary; key handling and the
//! board it drives live here so they can be tested without a terminal.

use std::path::Path;

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use tracing::warn;

use crate::config::{CanvasConfig, VizConfig, MAX_RANDOM_CITIES, MIN_RANDOM_CITIES};
use crate::error::TourResult;
use crate::tour::{Board, BoardView, Point, SolveStatus, StepFrame};

/// Smallest step delay the delay keys reach.
pub const MIN_UI_DELAY_MS: u64 = 10;
/// Largest step delay the delay keys reach.
pub const MAX_UI_DELAY_MS: u64 = 500;
/// Delay change per key press.
pub const DELAY_STEP_MS: u64 = 10;

/// Application state for the tour TUI.
#[derive(Debug)]
pub struct TourApp {
    /// Cities and solver.
    pub board: Board,
    /// City count for the next regeneration.
    pub random_count: usize,
    /// Delay between steps.
    pub step_delay_ms: u64,
    /// Frames published by the scheduler.
    pub frames_published: u64,
    /// Last rejected action, shown in the status bar.
    pub message: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Set when a key starts the animation; the wall clock must restart.
    resync_clock: bool,
}

impl TourApp {
    /// Create the app from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &VizConfig) -> TourResult<Self> {
        Ok(Self {
            board: Board::from_config(config)?,
            random_count: config.cities.random_count,
            step_delay_ms: config.solver.step_delay_ms,
            frames_published: 0,
            message: None,
            should_quit: false,
            resync_clock: false,
        })
    }

    /// Create the app from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or is invalid.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> TourResult<Self> {
        Self::from_config(&VizConfig::load(path)?)
    }

    /// Let `elapsed_ms` of wall time drive the scheduler.
    pub fn tick(&mut self, elapsed_ms: u64) -> usize {
        let mut published = 0u64;
        let mut count = |_: &StepFrame<'_>| published += 1;
        let fired = self.board.advance_time(elapsed_ms, &mut count);
        self.frames_published += published;
        fired
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        self.message = None;
        let was_animating = self.is_animating();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.start_or_toggle(),
            KeyCode::Char('g') => {
                let result = self.board.generate_random(self.random_count);
                self.report(result);
            }
            KeyCode::Char('c') => self.board.clear(),
            KeyCode::Char('s') => self.cycle_start(),
            KeyCode::Char('+' | '=') => self.adjust_delay(true),
            KeyCode::Char('-') => self.adjust_delay(false),
            KeyCode::Char(']') => {
                self.random_count = (self.random_count + 1).min(MAX_RANDOM_CITIES);
            }
            KeyCode::Char('[') => {
                self.random_count = self.random_count.saturating_sub(1).max(MIN_RANDOM_CITIES);
            }
            _ => {}
        }
        if !was_animating && self.is_animating() {
            self.resync_clock = true;
        }
    }

    /// Place a city where a click landed inside the bordered `plot` area.
    ///
    /// Clicks on the border or outside the plot are ignored.
    pub fn handle_click(&mut self, column: u16, row: u16, plot: Rect) {
        self.message = None;
        let Some(position) = plot_to_canvas(column, row, plot, self.board.canvas()) else {
            return;
        };
        let result = self.board.add_city(position);
        self.report(result);
    }

    /// Whether the wall clock driving [`tick`](Self::tick) must restart.
    ///
    /// Returns `true` once after a key press starts the animation, so the
    /// idle time before it is not replayed as steps.
    pub fn take_clock_resync(&mut self) -> bool {
        std::mem::take(&mut self.resync_clock)
    }

    fn start_or_toggle(&mut self) {
        if self.board.status().is_active() {
            self.board.toggle_pause();
            return;
        }
        let mut published = 0u64;
        let mut count = |_: &StepFrame<'_>| published += 1;
        match self.board.solve(&mut count) {
            Ok(true) => {}
            Ok(false) => self.message = Some("Add at least two cities to solve".to_string()),
            Err(e) => self.report::<()>(Err(e)),
        }
        self.frames_published += published;
    }

    fn cycle_start(&mut self) {
        let n = self.board.cities().len();
        if n == 0 {
            return;
        }
        let next = match self.board.start_city() {
            None => Some(0),
            Some(i) if i + 1 < n => Some(i + 1),
            Some(_) => None,
        };
        let result = self.board.set_start_city(next);
        self.report(result);
    }

    fn adjust_delay(&mut self, slower: bool) {
        let delay = if slower {
            self.step_delay_ms.saturating_add(DELAY_STEP_MS)
        } else {
            self.step_delay_ms.saturating_sub(DELAY_STEP_MS)
        }
        .clamp(MIN_UI_DELAY_MS, MAX_UI_DELAY_MS);

        let result = self.board.set_step_delay(delay);
        if result.is_ok() {
            self.step_delay_ms = delay;
        }
        self.report(result);
    }

    fn report<T>(&mut self, result: TourResult<T>) {
        if let Err(e) = result {
            warn!(error = %e, "action rejected");
            self.message = Some(e.to_string());
        }
    }

    /// Read-only view of the board.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        self.board.view()
    }

    /// Whether the app should quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether a tick is waiting to fire.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.board.status() == SolveStatus::Solving
    }
}

/// Map a terminal cell to canvas pixels.
///
/// `plot` is the bordered widget area. The canvas is drawn with its y axis
/// flipped, so the top row is canvas y 0. Returns `None` for cells outside
/// the inner area or when it is too small to resolve a position.
#[must_use]
pub fn plot_to_canvas(column: u16, row: u16, plot: Rect, canvas: &CanvasConfig) -> Option<Point> {
    let inner = Rect::new(
        plot.x.saturating_add(1),
        plot.y.saturating_add(1),
        plot.width.saturating_sub(2),
        plot.height.saturating_sub(2),
    );
    if inner.width < 2 || inner.height < 2 {
        return None;
    }
    if column < inner.x || column >= inner.right() || row < inner.y || row >= inner.bottom() {
        return None;
    }
    let fx = f64::from(column - inner.x) / f64::from(inner.width - 1);
    let fy = f64::from(row - inner.y) / f64::from(inner.height - 1);
    Some(Point::new(fx * canvas.width, fy * canvas.height))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::PresetCity;

    fn square_app() -> TourApp {
        let config = VizConfig::builder()
            .preset(vec![
                PresetCity::named(0.0, 0.0, "A"),
                PresetCity::named(10.0, 0.0, "B"),
                PresetCity::named(10.0, 10.0, "C"),
                PresetCity::named(0.0, 10.0, "D"),
            ])
            .build();
        TourApp::from_config(&config).expect("valid")
    }

    #[test]
    fn test_space_starts_then_toggles() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.view().status, SolveStatus::Solving);
        assert_eq!(app.frames_published, 1);

        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.view().status, SolveStatus::Paused);
        app.tick(1_000);
        assert_eq!(app.view().tour, &[0]);

        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.view().status, SolveStatus::Solving);
    }

    #[test]
    fn test_tick_runs_to_completion() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char(' '));
        app.tick(0);
        for _ in 0..3 {
            app.tick(50);
        }
        let view = app.view();
        assert_eq!(view.tour, &[0, 1, 2, 3, 0]);
        assert_eq!(view.distance, 4);
        assert_eq!(view.status_label(), "Complete");
        assert_eq!(app.frames_published, 5);
        assert!(!app.is_animating());
    }

    #[test]
    fn test_space_after_complete_restarts() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char(' '));
        app.tick(1_000);
        assert_eq!(app.view().status, SolveStatus::Complete);
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.view().status, SolveStatus::Solving);
        assert_eq!(app.view().tour, &[0]);
    }

    #[test]
    fn test_regenerate_rejected_while_solving() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('g'));
        assert!(app.message.is_some());
        assert_eq!(app.view().cities.len(), 4);
    }

    #[test]
    fn test_regenerate_uses_random_count() {
        let mut app = square_app();
        app.random_count = 5;
        app.handle_key(KeyCode::Char(']'));
        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.view().cities.len(), 6);
    }

    #[test]
    fn test_random_count_bounds() {
        let mut app = square_app();
        app.random_count = MIN_RANDOM_CITIES;
        app.handle_key(KeyCode::Char('['));
        assert_eq!(app.random_count, MIN_RANDOM_CITIES);

        app.random_count = MAX_RANDOM_CITIES;
        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.random_count, MAX_RANDOM_CITIES);
    }

    #[test]
    fn test_delay_keys_clamp() {
        let mut app = square_app();
        assert_eq!(app.step_delay_ms, 50);
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.step_delay_ms, 60);
        assert_eq!(app.board.scheduler().step_delay_ms(), 60);

        for _ in 0..100 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.step_delay_ms, MAX_UI_DELAY_MS);
        for _ in 0..100 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.step_delay_ms, MIN_UI_DELAY_MS);
    }

    #[test]
    fn test_cycle_start_wraps_to_default() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.view().selected_start, Some(0));
        for _ in 0..3 {
            app.handle_key(KeyCode::Char('s'));
        }
        assert_eq!(app.view().selected_start, Some(3));
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.view().selected_start, None);
    }

    #[test]
    fn test_clear_then_solve_reports_message() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char('c'));
        assert!(app.view().cities.is_empty());
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.view().status, SolveStatus::Idle);
        assert!(app.message.is_some());
    }

    const PLOT: Rect = Rect {
        x: 0,
        y: 0,
        width: 42,
        height: 22,
    };

    #[test]
    fn test_plot_corners_map_to_canvas_corners() {
        let canvas = CanvasConfig::default();
        let top_left = plot_to_canvas(1, 1, PLOT, &canvas).expect("inside");
        assert!(top_left.x.abs() < 1e-9 && top_left.y.abs() < 1e-9);

        let bottom_right = plot_to_canvas(40, 20, PLOT, &canvas).expect("inside");
        assert!((bottom_right.x - canvas.width).abs() < 1e-9);
        assert!((bottom_right.y - canvas.height).abs() < 1e-9);
    }

    #[test]
    fn test_plot_border_and_outside_ignored() {
        let canvas = CanvasConfig::default();
        assert!(plot_to_canvas(0, 5, PLOT, &canvas).is_none());
        assert!(plot_to_canvas(5, 0, PLOT, &canvas).is_none());
        assert!(plot_to_canvas(41, 5, PLOT, &canvas).is_none());
        assert!(plot_to_canvas(5, 21, PLOT, &canvas).is_none());
        assert!(plot_to_canvas(60, 30, PLOT, &canvas).is_none());
        assert!(plot_to_canvas(1, 1, Rect::new(0, 0, 3, 3), &canvas).is_none());
    }

    #[test]
    fn test_click_adds_city_and_clears_tour() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char(' '));
        app.tick(1_000);
        assert_eq!(app.view().status, SolveStatus::Complete);

        app.handle_click(21, 11, PLOT);
        let view = app.view();
        assert_eq!(view.cities.len(), 5);
        assert!(view.tour.is_empty());
        assert_eq!(view.distance, 0);
        assert_eq!(view.status, SolveStatus::Idle);
        assert_eq!(view.matrix.len(), 5);
        assert!(app.message.is_none());

        let placed = view.cities[4].position();
        assert!((placed.x - 20.0 * 800.0 / 39.0).abs() < 1e-9);
        assert!((placed.y - 10.0 * 600.0 / 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_click_on_border_adds_nothing() {
        let mut app = square_app();
        app.handle_click(0, 0, PLOT);
        assert_eq!(app.view().cities.len(), 4);
    }

    #[test]
    fn test_click_rejected_while_solving() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char(' '));
        app.handle_click(21, 11, PLOT);
        assert_eq!(app.view().cities.len(), 4);
        assert!(app.message.is_some());
        assert_eq!(app.view().status, SolveStatus::Solving);
    }

    #[test]
    fn test_clock_resync_once_per_start() {
        let mut app = square_app();
        assert!(!app.take_clock_resync());

        app.handle_key(KeyCode::Char(' '));
        assert!(app.take_clock_resync());
        assert!(!app.take_clock_resync());

        // pausing stops the animation, resuming starts it again
        app.handle_key(KeyCode::Char(' '));
        assert!(!app.take_clock_resync());
        app.handle_key(KeyCode::Char(' '));
        assert!(app.take_clock_resync());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = square_app();
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());

        let mut app = square_app();
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit());
    }
}
