use bubblescope_core::brush::PixelSpan;
use bubblescope_core::model::YearRange;
use bubblescope_core::{ChartDashboard, SelectionError};
use crossterm::event::KeyCode;
use tracing::info;

const RADIUS_STEP: f64 = 0.25;

/// Interactive session state around a dashboard: key bindings, the bubble
/// picked for inspection, and the last notice shown in the status line.
pub struct App {
    pub dashboard: ChartDashboard,
    pub notice: Option<String>,
    /// Position in the bubble draw order of the inspected game.
    pub inspected: Option<usize>,
    pub quit: bool,
}

impl App {
    pub fn new(dashboard: ChartDashboard) -> Self {
        Self {
            dashboard,
            notice: None,
            inspected: None,
            quit: false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let result = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                Ok(())
            }
            KeyCode::Char('t') => {
                let next = self.dashboard.state().game_type.toggled();
                self.dashboard.select_game_type(next)
            }
            KeyCode::Char('c') => {
                let on = !self.dashboard.state().compare_mode;
                self.dashboard.set_compare_mode(on)
            }
            KeyCode::Char(d @ '1'..='9') => self.toggle_catalog_genre(d),
            KeyCode::Char('[') => self.nudge_min_radius(-RADIUS_STEP),
            KeyCode::Char(']') => self.nudge_min_radius(RADIUS_STEP),
            KeyCode::Left => self.shift_years(-1.0),
            KeyCode::Right => self.shift_years(1.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.widen_years(1.0),
            KeyCode::Char('-') => self.widen_years(-1.0),
            KeyCode::Char('x') | KeyCode::Backspace => self.dashboard.brush(None),
            KeyCode::Tab => {
                self.inspect_next();
                Ok(())
            }
            _ => Ok(()),
        };
        self.report(result);
    }

    /// Brush dragged on the timeline between two chart x coordinates.
    pub fn brush_pixels(&mut self, x0: f64, x1: f64) {
        let result = if (x1 - x0).abs() < f64::EPSILON {
            self.dashboard.brush(None)
        } else {
            self.dashboard.brush(Some(PixelSpan::new(x0, x1)))
        };
        self.report(result);
    }

    /// Name and tooltip of the inspected bubble, if any.
    pub fn inspected_label(&self) -> Option<String> {
        let position = self.inspected?;
        let views = self.dashboard.views();
        let hit = views.bubble().hits().get(position)?;
        let record = self.dashboard.dataset().record(hit.index)?;
        Some(bubblescope_core::views::bubble::tooltip(record).replace('\n', " | "))
    }

    fn report(&mut self, result: Result<(), SelectionError>) {
        match result {
            Ok(()) => {
                self.notice = None;
                let count = self.dashboard.views().bubble().hits().len();
                if self.inspected.is_some_and(|i| i >= count) {
                    self.inspected = None;
                }
            }
            Err(err) => {
                info!(%err, "control change rejected");
                self.notice = Some(err.to_string());
            }
        }
    }

    fn toggle_catalog_genre(&mut self, digit: char) -> Result<(), SelectionError> {
        let Some(index) = digit.to_digit(10).map(|d| d as usize - 1) else {
            return Ok(());
        };
        let Some(genre) = self.dashboard.config().genre_catalog.get(index).cloned() else {
            return Ok(());
        };
        self.dashboard.toggle_genre(&genre)
    }

    fn nudge_min_radius(&mut self, delta: f64) -> Result<(), SelectionError> {
        let (lo, hi) = self.dashboard.config().radius.slider_bounds();
        let min = (self.dashboard.state().radius_extent.min + delta).clamp(lo, hi);
        self.dashboard.set_min_radius(min)
    }

    fn year_bounds(&self) -> YearRange {
        self.dashboard.views().brush_mapper().year_bounds()
    }

    fn shift_years(&mut self, by: f64) -> Result<(), SelectionError> {
        let bounds = self.year_bounds();
        let current = self.dashboard.state().year_range;
        let by = by.clamp(bounds.start - current.start, bounds.end - current.end);
        if by == 0.0 {
            return Ok(());
        }
        self.dashboard
            .set_year_range(YearRange::new(current.start + by, current.end + by))
    }

    fn widen_years(&mut self, by: f64) -> Result<(), SelectionError> {
        let bounds = self.year_bounds();
        let current = self.dashboard.state().year_range;
        let start = (current.start - by).max(bounds.start);
        let end = (current.end + by).min(bounds.end);
        if start > end {
            return Ok(());
        }
        self.dashboard.set_year_range(YearRange::new(start, end))
    }

    fn inspect_next(&mut self) {
        let count = self.dashboard.views().bubble().hits().len();
        self.inspected = match self.inspected {
            _ if count == 0 => None,
            None => Some(0),
            Some(i) => Some((i + 1) % count),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use bubblescope_core::DashboardConfig;
    use bubblescope_core::parsers::load_dataset;
    use bubblescope_core::state::GameType;

    use super::*;

    const CSV: &[u8] = b"name,price_initial (USD),positive_percentual,total_reviews,genres,release_date
Hollow Knight,14.99,97,250000,\"['Indie', 'Action', 'Adventure']\",2017-02-24
Hades,24.99,98,200000,\"['Indie', 'Action', 'RPG']\",2020-09-17
Super Meat Boy,14.99,92,30000,\"['Indie', 'Action']\",2010-11-30
Doom,19.99,95,150000,\"['Action']\",2016-05-13
";

    fn app() -> App {
        let (dataset, _) = load_dataset(CSV).unwrap();
        let dashboard =
            ChartDashboard::with_charts(Rc::new(dataset), DashboardConfig::default()).unwrap();
        App::new(dashboard)
    }

    #[test]
    fn keys_drive_the_controls() {
        let mut app = app();
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.dashboard.state().game_type, GameType::Studio);
        app.handle_key(KeyCode::Char('c'));
        assert!(app.dashboard.state().compare_mode);
        assert_eq!(app.dashboard.stats().bubble_total(), 4);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn removing_last_genre_shows_notice() {
        let mut app = app();
        // Catalog slot 1 is Action, the only default genre.
        app.handle_key(KeyCode::Char('1'));
        assert!(app.notice.is_some());
        assert!(app.dashboard.state().required_genres.contains("Action"));

        app.handle_key(KeyCode::Char('5'));
        assert!(app.notice.is_none());
        assert!(app.dashboard.state().required_genres.contains("RPG"));
    }

    #[test]
    fn year_keys_move_inside_bounds() {
        let mut app = app();
        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.dashboard.state().year_range, YearRange::from_years(2011, 2019));
        app.handle_key(KeyCode::Left);
        assert_eq!(app.dashboard.state().year_range, YearRange::from_years(2010, 2018));
        app.handle_key(KeyCode::Left);
        assert_eq!(app.dashboard.state().year_range, YearRange::from_years(2010, 2018));
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.dashboard.state().year_range, YearRange::from_years(2010, 2020));
    }

    #[test]
    fn radius_keys_stay_within_slider() {
        let mut app = app();
        let (lo, _) = app.dashboard.config().radius.slider_bounds();
        app.handle_key(KeyCode::Char('['));
        assert_eq!(app.dashboard.state().radius_extent.min, lo);
        app.handle_key(KeyCode::Char(']'));
        assert!((app.dashboard.state().radius_extent.min - (lo + RADIUS_STEP)).abs() < 1e-9);
    }

    #[test]
    fn tab_cycles_inspected_bubble() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.inspected, Some(0));
        let label = app.inspected_label().unwrap();
        assert!(label.starts_with("Hollow Knight | Price: $14.99"));
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.inspected, Some(0));
    }
}
