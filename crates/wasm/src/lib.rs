use std::rc::Rc;

use bubblescope_core::brush::PixelSpan;
use bubblescope_core::model::YearRange;
use bubblescope_core::parsers::{self, LoadReport};
use bubblescope_core::state::GameType;
use bubblescope_core::{ChartDashboard, DashboardConfig};
use bubblescope_protocol::Point;
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(to_js)
}

/// A loaded dataset and its dashboard, owned by the JS side.
///
/// Every setter runs the full update synchronously; afterwards the
/// `*_commands` getters return the redrawn charts.
#[wasm_bindgen]
pub struct WasmDashboard {
    inner: ChartDashboard,
    report: LoadReport,
}

#[wasm_bindgen]
impl WasmDashboard {
    /// Parse a Steam games CSV. `config_json` overrides the default config.
    pub fn from_csv(data: &[u8], config_json: Option<String>) -> Result<WasmDashboard, JsError> {
        let config = match config_json {
            Some(text) => DashboardConfig::from_json(&text).map_err(to_js)?,
            None => DashboardConfig::default(),
        };
        let (dataset, report) = parsers::load_dataset(data).map_err(to_js)?;
        let inner = ChartDashboard::with_charts(Rc::new(dataset), config).map_err(to_js)?;
        Ok(Self { inner, report })
    }

    /// `"indie"` or `"studio"`.
    pub fn set_game_type(&mut self, game_type: &str) -> Result<(), JsError> {
        let game_type: GameType = game_type.parse().map_err(to_js)?;
        self.inner.select_game_type(game_type).map_err(to_js)
    }

    pub fn set_genres(&mut self, genres: Vec<String>) -> Result<(), JsError> {
        self.inner.set_genres(genres).map_err(to_js)
    }

    pub fn toggle_genre(&mut self, genre: &str) -> Result<(), JsError> {
        self.inner.toggle_genre(genre).map_err(to_js)
    }

    pub fn set_compare_mode(&mut self, enabled: bool) -> Result<(), JsError> {
        self.inner.set_compare_mode(enabled).map_err(to_js)
    }

    pub fn set_min_radius(&mut self, min: f64) -> Result<(), JsError> {
        self.inner.set_min_radius(min).map_err(to_js)
    }

    pub fn set_year_range(&mut self, start: f64, end: f64) -> Result<(), JsError> {
        self.inner
            .set_year_range(YearRange::new(start, end))
            .map_err(to_js)
    }

    /// Brush moved to `[x0, x1]` in timeline pixels.
    pub fn brush(&mut self, x0: f64, x1: f64) -> Result<(), JsError> {
        self.inner
            .brush(Some(PixelSpan::new(x0, x1)))
            .map_err(to_js)
    }

    pub fn clear_brush(&mut self) -> Result<(), JsError> {
        self.inner.brush(None).map_err(to_js)
    }

    pub fn bubble_commands(&self) -> Result<String, JsError> {
        to_json(&self.inner.bubble_commands())
    }

    pub fn timeline_commands(&self) -> Result<String, JsError> {
        to_json(&self.inner.timeline_commands())
    }

    pub fn state_json(&self) -> Result<String, JsError> {
        to_json(self.inner.state())
    }

    pub fn stats_json(&self) -> Result<String, JsError> {
        to_json(&self.inner.stats())
    }

    /// Genres offered as checkboxes, from the config catalog.
    pub fn genres_json(&self) -> Result<String, JsError> {
        to_json(&self.inner.config().genre_catalog)
    }

    pub fn load_report_json(&self) -> Result<String, JsError> {
        to_json(&self.report)
    }

    /// `[min, max]` the minimum-radius slider may take.
    pub fn radius_slider_bounds(&self) -> Vec<f64> {
        let (lo, hi) = self.inner.config().radius.slider_bounds();
        vec![lo, hi]
    }

    /// Dataset index of the bubble under `(x, y)`, for tooltips.
    pub fn record_at(&self, x: f64, y: f64) -> Option<usize> {
        self.inner.views().bubble().record_at(Point::new(x, y))
    }

    pub fn record_json(&self, index: usize) -> Result<String, JsError> {
        let record = self
            .inner
            .dataset()
            .record(index)
            .ok_or_else(|| JsError::new("invalid record index"))?;
        to_json(record)
    }

    pub fn svg(&self, dark: bool) -> String {
        self.inner.render_svg(dark)
    }
}
