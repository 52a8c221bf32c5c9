//! Integration test: load the sample export, build a dashboard with the
//! built-in charts and drive it through the control adapters.

use std::rc::Rc;

use bubblescope_core::brush::PixelSpan;
use bubblescope_core::model::YearRange;
use bubblescope_core::parsers::{RecordField, load_dataset};
use bubblescope_core::state::GameType;
use bubblescope_core::{ChartDashboard, DashboardConfig, SelectionError};
use bubblescope_protocol::RenderCommand;

const SAMPLE: &[u8] = include_bytes!("fixtures/steam_sample.csv");

fn dashboard() -> ChartDashboard {
    let (dataset, _report) = load_dataset(SAMPLE).unwrap();
    ChartDashboard::with_charts(Rc::new(dataset), DashboardConfig::default()).unwrap()
}

fn bubble_names(d: &ChartDashboard) -> Vec<String> {
    d.bubble_commands()
        .iter()
        .filter_map(|c| match c {
            RenderCommand::DrawCircle {
                record_index: Some(i),
                ..
            } => d.dataset().record(*i).map(|r| r.name.to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn sample_loads_with_sentinels() {
    let (dataset, report) = load_dataset(SAMPLE).unwrap();
    assert_eq!(dataset.len(), 15);
    assert_eq!(report.rows_read, 15);
    assert_eq!(report.rows_skipped, 0);
    // The cp1252 name is decoded lossily but the game stays.
    assert_eq!(report.count(RecordField::Name), 1);
    assert!(dataset.records().iter().any(|r| r.name.starts_with("Pok")));
    assert!(dataset.has_genre("Puzzle"));
    assert_eq!(report.count(RecordField::Price), 1);
    assert_eq!(report.count(RecordField::ReleaseDate), 1);
    assert_eq!(dataset.year_extent(), Some(YearRange::from_years(1998, 2021)));
    assert!(dataset.has_genre("Racing"));
}

#[test]
fn default_view_is_indie_action_by_reviews() {
    let d = dashboard();
    // Tiny Demo is under the review threshold; Broken Entry has no count.
    assert_eq!(
        bubble_names(&d),
        [
            "Hollow Knight",
            "Hades",
            "Dead Cells",
            "Celeste",
            "Super Meat Boy",
            "Spelunky",
        ]
    );
    let stats = d.stats();
    assert_eq!(stats.indie, 6);
    assert_eq!(stats.studio, 0);
}

#[test]
fn studio_and_compare_modes() {
    let mut d = dashboard();
    d.select_game_type(GameType::Studio).unwrap();
    assert_eq!(bubble_names(&d), ["Portal 2", "Doom", "Half-Life"]);

    d.set_compare_mode(true).unwrap();
    let names = bubble_names(&d);
    assert_eq!(names.len(), 9);
    assert_eq!(names[0], "Portal 2");
    assert_eq!(d.stats().bubble_total(), d.stats().indie + d.stats().studio);
}

#[test]
fn genres_are_conjunctive_and_never_empty() {
    let mut d = dashboard();
    d.toggle_genre("RPG").unwrap();
    assert_eq!(bubble_names(&d), ["Hades", "Dead Cells"]);

    let before = d.state().clone();
    let err = d.set_genres(Vec::<&str>::new()).unwrap_err();
    assert!(matches!(err, SelectionError::InvalidSelection { .. }));
    assert_eq!(*d.state(), before);
}

#[test]
fn brushing_narrows_bubbles_only() {
    let mut d = dashboard();
    let timeline_before = d.stats().timeline;

    d.set_year_range(YearRange::from_years(2017, 2018)).unwrap();
    assert_eq!(bubble_names(&d), ["Hollow Knight", "Dead Cells", "Celeste"]);
    assert_eq!(d.stats().timeline, timeline_before);

    let span = d.brush_span().unwrap();
    let round_trip = d.views().brush_mapper().pixel_range_to_year_range(span);
    assert!((round_trip.start - 2017.0).abs() < 1e-6);
    assert!((round_trip.end - 2018.0).abs() < 1e-6);

    d.brush(None).unwrap();
    assert_eq!(d.state().year_range, YearRange::from_years(1998, 2021));
    assert_eq!(d.brush_span(), None);
    assert_eq!(bubble_names(&d).len(), 6);
}

#[test]
fn brush_gesture_over_the_plot() {
    let mut d = dashboard();
    let plot = d.views().timeline().plot();
    d.brush(Some(PixelSpan::new(plot.right() - 1.0, plot.right())))
        .unwrap();
    let range = d.state().year_range;
    assert!(range.end <= 2021.0 + 1e-9);
    assert!(range.start >= 2009.0);
}

#[test]
fn empty_result_still_renders() {
    let mut d = dashboard();
    d.set_genres(["Racing"]).unwrap();
    assert!(bubble_names(&d).is_empty());
    assert!(d.bubble_commands().iter().any(|c| matches!(
        c,
        RenderCommand::DrawText { text, .. } if text.as_str().starts_with("No games")
    )));
    assert!(d.render_svg(true).ends_with("</svg>"));
}
