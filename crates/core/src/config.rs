use std::path::Path;

use bubblescope_protocol::Viewport;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::{GameType, RadiusExtent};

/// Startup configuration for a dashboard.
///
/// Every field has a default matching the shipped dashboard, so a config
/// file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Records with fewer reviews are never shown.
    pub min_review_threshold: u64,
    /// Years before this are left out of the timeline histogram and its
    /// scale domain (the dataset has a handful of very old outliers).
    pub timeline_min_year: Option<i32>,
    pub default_game_type: GameType,
    pub default_genres: Vec<String>,
    /// Genres offered as checkboxes, in display order.
    pub genre_catalog: Vec<String>,
    pub radius: RadiusConfig,
    pub bubble_viewport: Viewport,
    pub timeline_viewport: Viewport,
}

/// Bubble radius is `sqrt(reviews + 1) * review_factor` pixels at the
/// configured review counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusConfig {
    pub review_factor: f64,
    /// Review count whose radius is the slider's lower bound and the
    /// default minimum radius.
    pub slider_min_reviews: u64,
    /// Review count whose radius is the slider's upper bound.
    pub slider_max_reviews: u64,
    /// Review count whose radius is the fixed maximum radius.
    pub max_reviews: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            min_review_threshold: 500,
            timeline_min_year: Some(2006),
            default_game_type: GameType::Indie,
            default_genres: vec!["Action".to_string()],
            genre_catalog: [
                "Action",
                "Adventure",
                "Casual",
                "Racing",
                "RPG",
                "Simulation",
                "Strategy",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            radius: RadiusConfig::default(),
            bubble_viewport: Viewport::new(960.0, 540.0),
            timeline_viewport: Viewport::new(960.0, 100.0),
        }
    }
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            review_factor: 0.06,
            slider_min_reviews: 500,
            slider_max_reviews: 50_000,
            max_reviews: 1_279_700,
        }
    }
}

impl RadiusConfig {
    pub fn radius_for_reviews(&self, reviews: u64) -> f64 {
        ((reviews as f64) + 1.0).sqrt() * self.review_factor
    }

    /// Radius extent a fresh dashboard starts with.
    pub fn default_extent(&self) -> RadiusExtent {
        RadiusExtent {
            min: self.radius_for_reviews(self.slider_min_reviews),
            max: self.radius_for_reviews(self.max_reviews),
        }
    }

    /// Range the minimum-radius slider may move in.
    pub fn slider_bounds(&self) -> (f64, f64) {
        (
            self.radius_for_reviews(self.slider_min_reviews),
            self.radius_for_reviews(self.slider_max_reviews),
        )
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_genres.is_empty() {
            return Err(ConfigError::Invalid(
                "default_genres must name at least one genre".into(),
            ));
        }
        if self.default_genres.iter().any(|g| g.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "default_genres must not contain blank tags".into(),
            ));
        }
        let r = &self.radius;
        if self.min_review_threshold > r.max_reviews {
            return Err(ConfigError::Invalid(format!(
                "min_review_threshold {} exceeds radius.max_reviews {}",
                self.min_review_threshold, r.max_reviews
            )));
        }
        if !(r.review_factor.is_finite() && r.review_factor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "radius.review_factor must be positive, got {}",
                r.review_factor
            )));
        }
        if r.slider_min_reviews > r.slider_max_reviews || r.slider_max_reviews > r.max_reviews {
            return Err(ConfigError::Invalid(
                "radius review counts must satisfy slider_min <= slider_max <= max".into(),
            ));
        }
        for (name, vp) in [
            ("bubble_viewport", &self.bubble_viewport),
            ("timeline_viewport", &self.timeline_viewport),
        ] {
            if !(vp.width > 0.0 && vp.height > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must have a positive size"
                )));
            }
        }
        Ok(())
    }
}
