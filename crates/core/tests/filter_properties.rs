//! Property tests for the filter engine over generated datasets.

use std::collections::BTreeSet;

use bubblescope_core::filter::{compute_views, passes_base};
use bubblescope_core::model::{Category, Record, YearRange};
use bubblescope_core::state::{GameType, RadiusExtent, SelectionState};
use bubblescope_protocol::SharedStr;
use proptest::prelude::*;

const GENRES: [&str; 5] = ["Indie", "Action", "RPG", "Racing", "Strategy"];

fn arb_record() -> impl Strategy<Value = Record> {
    (
        "[A-Z][a-z]{2,8}",
        prop::option::of(0u64..5_000),
        prop::option::of(2000i32..2025),
        prop::collection::btree_set(prop::sample::select(GENRES.to_vec()), 0..4),
    )
        .prop_map(|(name, reviews, year, genres)| Record {
            name: name.into(),
            price: 9.99,
            positive_rate: 75.0,
            review_count: reviews,
            release_year: year,
            genres: genres.into_iter().map(SharedStr::from).collect(),
        })
}

fn arb_state() -> impl Strategy<Value = SelectionState> {
    (
        prop::bool::ANY,
        prop::bool::ANY,
        prop::collection::btree_set(prop::sample::select(GENRES[1..].to_vec()), 1..3),
        0u64..1_000,
        2000i32..2025,
        0i32..25,
    )
        .prop_map(|(studio, compare_mode, genres, threshold, start, len)| SelectionState {
            game_type: if studio { GameType::Studio } else { GameType::Indie },
            required_genres: genres.into_iter().map(SharedStr::from).collect::<BTreeSet<_>>(),
            compare_mode,
            min_review_threshold: threshold,
            year_range: YearRange::from_years(start, start + len),
            radius_extent: RadiusExtent { min: 1.0, max: 60.0 },
        })
}

proptest! {
    #[test]
    fn bubble_set_is_a_sorted_subset_passing_the_predicate(
        records in prop::collection::vec(arb_record(), 0..60),
        state in arb_state(),
    ) {
        let output = compute_views(&records, &state).unwrap();

        for fr in &output.bubble {
            prop_assert!(std::ptr::eq(fr.record, &records[fr.index]));
            prop_assert!(passes_base(fr.record, &state));
            prop_assert_eq!(fr.category, fr.record.category());
            if !state.compare_mode {
                prop_assert_eq!(fr.category, state.game_type.category());
            }
        }
        for pair in output.bubble.windows(2) {
            prop_assert!(pair[0].record.review_key() >= pair[1].record.review_key());
        }
        let indices: BTreeSet<usize> = output.bubble.iter().map(|r| r.index).collect();
        prop_assert_eq!(indices.len(), output.bubble.len());
    }

    #[test]
    fn compare_mode_is_the_union_of_both_types(
        records in prop::collection::vec(arb_record(), 0..60),
        state in arb_state(),
    ) {
        let mut compare = state.clone();
        compare.compare_mode = true;
        let mut indie = state.clone();
        indie.compare_mode = false;
        indie.game_type = GameType::Indie;
        let mut studio = indie.clone();
        studio.game_type = GameType::Studio;

        let both = compute_views(&records, &compare).unwrap();
        let only_indie = compute_views(&records, &indie).unwrap();
        let only_studio = compute_views(&records, &studio).unwrap();

        prop_assert_eq!(both.bubble.len(), only_indie.bubble.len() + only_studio.bubble.len());
        prop_assert_eq!(both.bubble_count(Category::Indie), only_indie.bubble.len());
        prop_assert_eq!(both.bubble_count(Category::Studio), only_studio.bubble.len());
    }

    #[test]
    fn bubble_set_is_the_timeline_set_narrowed_by_year(
        records in prop::collection::vec(arb_record(), 0..60),
        state in arb_state(),
    ) {
        let output = compute_views(&records, &state).unwrap();
        let narrowed: Vec<usize> = output
            .timeline
            .iter()
            .filter(|r| r.record.release_year.is_some_and(|y| state.year_range.contains_year(y)))
            .map(|r| r.index)
            .collect();
        let bubble: Vec<usize> = output.bubble.iter().map(|r| r.index).collect();
        prop_assert_eq!(bubble, narrowed);
    }
}
