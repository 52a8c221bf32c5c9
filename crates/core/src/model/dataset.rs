use std::collections::BTreeSet;

use bubblescope_protocol::SharedStr;
use serde::{Deserialize, Serialize};

use super::record::Record;
use super::year_range::YearRange;

/// The canonical record set.
///
/// Built once at load and never mutated; every view and the filter engine
/// read from the same `Dataset` (shared behind an `Rc`). Derived values
/// that only depend on the records are computed up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
    year_extent: Option<YearRange>,
    genres: Vec<SharedStr>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let year_extent = observed_year_extent(&records);
        let genres = records
            .iter()
            .flat_map(|r| r.genres.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            records,
            year_extent,
            genres,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full observed release-year extent, over records with a usable year.
    ///
    /// This is the range a cleared brush resets to, regardless of what the
    /// current filters leave visible.
    pub fn year_extent(&self) -> Option<YearRange> {
        self.year_extent
    }

    /// Every genre tag that occurs in the dataset, sorted.
    pub fn genres(&self) -> &[SharedStr] {
        &self.genres
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres
            .binary_search_by(|g| g.as_str().cmp(genre))
            .is_ok()
    }
}

fn observed_year_extent(records: &[Record]) -> Option<YearRange> {
    let (min, max) = records
        .iter()
        .filter_map(|r| r.release_year)
        .fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    (min <= max).then(|| YearRange::from_years(min, max))
}
