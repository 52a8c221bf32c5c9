//! Filter composition: which records each view shows for a given selection.
//!
//! Everything here is a pure function of the canonical records and the
//! selection state. Records are never copied or mutated; the output borrows
//! them and carries the category each one is drawn as.

use serde::Serialize;

use crate::error::SelectionError;
use crate::model::{Category, Record, YearRange};
use crate::state::SelectionState;

/// A record that passed the filter, tagged with the population it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilteredRecord<'a> {
    /// Position of the record in the dataset.
    pub index: usize,
    pub record: &'a Record,
    pub category: Category,
}

/// Both record sets a state change produces, from a single pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOutput<'a> {
    /// Type, genre and review filters applied; year bound ignored. Feeds the
    /// timeline so its x-domain spans every year, not just the brushed ones.
    pub timeline: Vec<FilteredRecord<'a>>,
    /// `timeline` narrowed to the selected year range.
    pub bubble: Vec<FilteredRecord<'a>>,
}

impl FilterOutput<'_> {
    pub fn bubble_count(&self, category: Category) -> usize {
        self.bubble.iter().filter(|r| r.category == category).count()
    }
}

/// Review, year and genre predicate shared by every game-type mode.
pub fn passes_base(record: &Record, state: &SelectionState) -> bool {
    passes_base_ignoring_year(record, state)
        && record
            .release_year
            .is_some_and(|year| state.year_range.contains_year(year))
}

/// The base predicate without the year bound.
pub fn passes_base_ignoring_year(record: &Record, state: &SelectionState) -> bool {
    record
        .review_count
        .is_some_and(|n| n >= state.min_review_threshold)
        && record.has_all_genres(&state.required_genres)
}

/// Records the bubble chart shows, largest review count first.
pub fn compute_filtered<'a>(
    records: &'a [Record],
    state: &SelectionState,
) -> Result<Vec<FilteredRecord<'a>>, SelectionError> {
    Ok(compute_views(records, state)?.bubble)
}

/// Compute the timeline and bubble record sets together.
pub fn compute_views<'a>(
    records: &'a [Record],
    state: &SelectionState,
) -> Result<FilterOutput<'a>, SelectionError> {
    let timeline = compute_timeline(records, state)?;
    let bubble = narrow_to_years(&timeline, state.year_range);
    Ok(FilterOutput { timeline, bubble })
}

/// Records the timeline shows: type, genre and review filters, any year.
///
/// Outside compare mode only records whose category matches the selected
/// game type are kept. In compare mode the indie and studio subsets are
/// collected separately, concatenated, and re-sorted as one list, so equal
/// review counts keep indie records ahead of studio ones.
pub fn compute_timeline<'a>(
    records: &'a [Record],
    state: &SelectionState,
) -> Result<Vec<FilteredRecord<'a>>, SelectionError> {
    if state.required_genres.is_empty() {
        return Err(SelectionError::invalid(
            "no genre selected, refusing to filter",
        ));
    }

    let wanted = state.game_type.category();
    let mut indie = Vec::new();
    let mut studio = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let category = record.category();
        if !state.compare_mode && category != wanted {
            continue;
        }
        if !passes_base_ignoring_year(record, state) {
            continue;
        }
        let tagged = FilteredRecord {
            index,
            record,
            category,
        };
        match category {
            Category::Indie => indie.push(tagged),
            Category::Studio => studio.push(tagged),
        }
    }

    let mut timeline = indie;
    timeline.append(&mut studio);
    timeline.sort_by(|a, b| b.record.review_key().cmp(&a.record.review_key()));
    Ok(timeline)
}

/// Keep the records released inside `years`, in their existing order.
pub fn narrow_to_years<'a>(
    records: &[FilteredRecord<'a>],
    years: YearRange,
) -> Vec<FilteredRecord<'a>> {
    records
        .iter()
        .filter(|r| {
            r.record
                .release_year
                .is_some_and(|year| years.contains_year(year))
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::fixtures::record;
    use crate::state::{GameType, RadiusExtent};
    use bubblescope_protocol::SharedStr;

    fn abc() -> Vec<Record> {
        vec![
            record("A", &["Indie", "Action"], 1000, 2015),
            record("B", &["Action"], 2000, 2018),
            record("C", &["Indie", "Action"], 100, 2015),
        ]
    }

    fn state() -> SelectionState {
        SelectionState {
            game_type: GameType::Indie,
            required_genres: [SharedStr::from("Action")].into(),
            compare_mode: false,
            min_review_threshold: 500,
            year_range: YearRange::from_years(2006, 2025),
            radius_extent: RadiusExtent { min: 1.0, max: 60.0 },
        }
    }

    fn names(out: &[FilteredRecord<'_>]) -> Vec<String> {
        out.iter().map(|r| r.record.name.to_string()).collect()
    }

    #[test]
    fn indie_filter_applies_threshold_and_type() {
        let records = abc();
        let out = compute_filtered(&records, &state()).unwrap();
        assert_eq!(names(&out), ["A"]);
        assert_eq!(out[0].category, Category::Indie);
        assert_eq!(out[0].index, 0);
    }

    #[test]
    fn studio_filter() {
        let records = abc();
        let mut s = state();
        s.game_type = GameType::Studio;
        let out = compute_filtered(&records, &s).unwrap();
        assert_eq!(names(&out), ["B"]);
        assert_eq!(out[0].category, Category::Studio);
    }

    #[test]
    fn compare_mode_merges_and_sorts_by_reviews() {
        let records = abc();
        let mut s = state();
        s.compare_mode = true;
        let out = compute_filtered(&records, &s).unwrap();
        assert_eq!(names(&out), ["B", "A"]);
        assert_eq!(out[0].category, Category::Studio);
        assert_eq!(out[1].category, Category::Indie);
    }

    #[test]
    fn compare_mode_ignores_game_type() {
        let records = abc();
        let mut s = state();
        s.compare_mode = true;
        let indie_first = compute_filtered(&records, &s).unwrap();
        s.game_type = GameType::Studio;
        let studio_first = compute_filtered(&records, &s).unwrap();
        assert_eq!(indie_first, studio_first);
    }

    #[test]
    fn compare_ties_keep_indie_before_studio() {
        let records = vec![
            record("S", &["Action"], 800, 2015),
            record("I", &["Indie", "Action"], 800, 2015),
        ];
        let mut s = state();
        s.compare_mode = true;
        let out = compute_filtered(&records, &s).unwrap();
        assert_eq!(names(&out), ["I", "S"]);
    }

    #[test]
    fn year_narrowing_only_affects_bubble_set() {
        let records = abc();
        let mut s = state();
        s.year_range = YearRange::from_years(2016, 2025);
        let out = compute_views(&records, &s).unwrap();
        assert!(out.bubble.is_empty());
        assert_eq!(names(&out.timeline), ["A"]);
    }

    #[test]
    fn genres_are_required_together() {
        let records = vec![
            record("AR", &["Indie", "Action", "RPG"], 900, 2019),
            record("A", &["Indie", "Action"], 5000, 2019),
        ];
        let mut s = state();
        s.required_genres = [SharedStr::from("Action"), SharedStr::from("RPG")].into();
        let out = compute_filtered(&records, &s).unwrap();
        assert_eq!(names(&out), ["AR"]);
    }

    #[test]
    fn sentinel_fields_never_pass() {
        let mut no_reviews = record("N", &["Indie", "Action"], 0, 2015);
        no_reviews.review_count = None;
        let mut no_year = record("Y", &["Indie", "Action"], 5000, 0);
        no_year.release_year = None;
        let records = vec![no_reviews, no_year];
        let out = compute_views(&records, &state()).unwrap();
        assert!(out.bubble.is_empty());
        // Missing year still counts towards the year-agnostic set.
        assert_eq!(names(&out.timeline), ["Y"]);
    }

    #[test]
    fn empty_genres_is_invalid_selection() {
        let records = abc();
        let mut s = state();
        s.required_genres.clear();
        let result = compute_filtered(&records, &s);
        assert!(matches!(result, Err(SelectionError::InvalidSelection { .. })));
    }

    #[test]
    fn empty_result_is_ok() {
        let records = abc();
        let mut s = state();
        s.required_genres = [SharedStr::from("Racing")].into();
        let out = compute_filtered(&records, &s).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn filtering_is_deterministic() {
        let records = abc();
        let mut s = state();
        s.compare_mode = true;
        let a = compute_views(&records, &s).unwrap();
        let b = compute_views(&records, &s).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.bubble_count(Category::Indie), 1);
        assert_eq!(a.bubble_count(Category::Studio), 1);
    }
}
