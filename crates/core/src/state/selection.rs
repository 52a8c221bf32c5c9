use std::collections::BTreeSet;

use bubblescope_protocol::SharedStr;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::error::LoadError;
use crate::model::{Category, Dataset, YearRange};

/// Which population is shown when compare mode is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Indie,
    Studio,
}

impl GameType {
    pub fn category(self) -> Category {
        match self {
            GameType::Indie => Category::Indie,
            GameType::Studio => Category::Studio,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            GameType::Indie => GameType::Studio,
            GameType::Studio => GameType::Indie,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameType::Indie => "Indie Games",
            GameType::Studio => "Studio Games (Non-Indie)",
        }
    }
}

impl std::str::FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indie" => Ok(GameType::Indie),
            "studio" => Ok(GameType::Studio),
            other => Err(format!("unknown game type: {other}")),
        }
    }
}

/// Bubble radius range in pixels: the smallest and largest review counts
/// map to `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusExtent {
    pub min: f64,
    pub max: f64,
}

impl RadiusExtent {
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && 0.0 <= self.min && self.min <= self.max
    }
}

/// Which control a store mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionChange {
    GameType,
    Genres,
    CompareMode,
    YearRange,
    RadiusExtent,
}

/// Current value of every dashboard control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub game_type: GameType,
    /// A record must carry all of these tags.
    pub required_genres: BTreeSet<SharedStr>,
    /// Show indie and studio games together, tagged by category.
    pub compare_mode: bool,
    pub min_review_threshold: u64,
    pub year_range: YearRange,
    pub radius_extent: RadiusExtent,
}

impl SelectionState {
    /// Startup state: configured defaults over the dataset's full year extent.
    pub fn initial(config: &DashboardConfig, dataset: &Dataset) -> Result<Self, LoadError> {
        let year_range = dataset.year_extent().ok_or(LoadError::NoYears)?;
        Ok(Self {
            game_type: config.default_game_type,
            required_genres: config
                .default_genres
                .iter()
                .map(|g| SharedStr::from(g.as_str()))
                .collect(),
            compare_mode: false,
            min_review_threshold: config.min_review_threshold,
            year_range,
            radius_extent: config.radius.default_extent(),
        })
    }
}
