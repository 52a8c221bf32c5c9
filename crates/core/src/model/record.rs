use std::collections::BTreeSet;

use bubblescope_protocol::SharedStr;
use serde::{Deserialize, Serialize};

/// Genre tag that splits the dataset into indie and studio games.
pub const INDIE_TAG: &str = "Indie";

/// One normalized game entry.
///
/// Fields that failed to parse hold a sentinel instead of failing the row:
/// `NaN` for the continuous measures, `None` for the integer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: SharedStr,
    /// Initial price in USD.
    pub price: f64,
    /// Share of positive reviews, 0–100.
    pub positive_rate: f64,
    pub review_count: Option<u64>,
    pub release_year: Option<i32>,
    pub genres: BTreeSet<SharedStr>,
}

impl Record {
    pub fn is_indie(&self) -> bool {
        self.genres.contains(INDIE_TAG)
    }

    pub fn category(&self) -> Category {
        if self.is_indie() {
            Category::Indie
        } else {
            Category::Studio
        }
    }

    /// Whether every tag in `required` is present on this record.
    pub fn has_all_genres(&self, required: &BTreeSet<SharedStr>) -> bool {
        required.is_subset(&self.genres)
    }

    /// Review count as a sort key; missing counts sort last.
    pub fn review_key(&self) -> u64 {
        self.review_count.unwrap_or(0)
    }
}

/// Which population a filtered record is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Indie,
    Studio,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Indie => "Indie",
            Category::Studio => "Studio",
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(name: &str, genres: &[&str], reviews: u64, year: i32) -> Record {
        Record {
            name: name.into(),
            price: 9.99,
            positive_rate: 80.0,
            review_count: Some(reviews),
            release_year: Some(year),
            genres: genres.iter().map(|g| SharedStr::from(*g)).collect(),
        }
    }
}
