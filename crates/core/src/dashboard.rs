use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use bubblescope_protocol::{RenderCommand, SharedStr};

use crate::brush::PixelSpan;
use crate::config::DashboardConfig;
use crate::coordinator::{BubbleView, FilterStats, TimelineView, ViewCoordinator};
use crate::error::{LoadError, SelectionError};
use crate::model::{Dataset, YearRange};
use crate::state::{
    GameType, ListenerId, RadiusExtent, SelectionChange, SelectionListener, SelectionState,
    SelectionStore,
};
use crate::svg;
use crate::views::{BubbleChart, TimelineChart};

/// A dashboard drawing with the built-in chart views.
pub type ChartDashboard = Dashboard<TimelineChart, BubbleChart>;

/// One dashboard session: the dataset, the selection store, and the views
/// kept in sync with it.
///
/// The methods here are the control adapters. Each turns a UI event into a
/// store setter; the store then notifies the coordinator, which redraws
/// every view before the method returns.
pub struct Dashboard<T, B> {
    dataset: Rc<Dataset>,
    config: DashboardConfig,
    store: SelectionStore,
    coordinator: Rc<RefCell<ViewCoordinator<T, B>>>,
}

impl<T, B> Dashboard<T, B>
where
    T: TimelineView + 'static,
    B: BubbleView + 'static,
{
    pub fn new(
        dataset: Rc<Dataset>,
        config: DashboardConfig,
        timeline: T,
        bubble: B,
    ) -> Result<Self, LoadError> {
        let state = SelectionState::initial(&config, &dataset)?;
        let year_bounds = state.year_range;
        let coordinator = Rc::new(RefCell::new(ViewCoordinator::new(
            Rc::clone(&dataset),
            year_bounds,
            config.timeline_min_year,
            timeline,
            bubble,
        )));

        let mut store = SelectionStore::new(state, year_bounds);
        store.subscribe(coordinator.clone());
        coordinator
            .borrow_mut()
            .on_state_change(store.state(), SelectionChange::YearRange);

        let mut dashboard = Self {
            dataset,
            config,
            store,
            coordinator,
        };
        dashboard.follow_brush();
        Ok(dashboard)
    }

    /// Copy the interval the views settled on back into the store, so the
    /// reported year range matches the drawn brush.
    fn follow_brush(&mut self) {
        let years = self.coordinator.borrow().years();
        self.store.sync_year_range(years);
    }

    fn settle(&mut self, result: Result<(), SelectionError>) -> Result<(), SelectionError> {
        if result.is_ok() {
            self.follow_brush();
        }
        result
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn state(&self) -> &SelectionState {
        self.store.state()
    }

    /// Register an extra listener, notified after the views.
    pub fn subscribe(&mut self, listener: Rc<RefCell<dyn SelectionListener>>) -> ListenerId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn select_game_type(&mut self, game_type: GameType) -> Result<(), SelectionError> {
        let result = self.store.set_game_type(game_type);
        self.settle(result)
    }

    pub fn set_genres<I, S>(&mut self, genres: I) -> Result<(), SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<SharedStr>,
    {
        let genres: BTreeSet<SharedStr> = genres.into_iter().map(Into::into).collect();
        let result = self.store.set_genres(genres);
        self.settle(result)
    }

    pub fn toggle_genre(&mut self, genre: &str) -> Result<(), SelectionError> {
        let result = self.store.toggle_genre(genre);
        self.settle(result)
    }

    pub fn set_compare_mode(&mut self, enabled: bool) -> Result<(), SelectionError> {
        let result = self.store.set_compare_mode(enabled);
        self.settle(result)
    }

    pub fn set_radius_extent(&mut self, extent: RadiusExtent) -> Result<(), SelectionError> {
        let result = self.store.set_radius_extent(extent);
        self.settle(result)
    }

    /// Minimum-radius slider. Values outside the configured slider bounds
    /// are rejected.
    pub fn set_min_radius(&mut self, min: f64) -> Result<(), SelectionError> {
        let (lo, hi) = self.config.radius.slider_bounds();
        if !(lo..=hi).contains(&min) {
            return Err(SelectionError::invalid(format!(
                "minimum radius {min} is outside the slider range [{lo}, {hi}]"
            )));
        }
        let result = self.store.set_min_radius(min);
        self.settle(result)
    }

    pub fn set_year_range(&mut self, range: YearRange) -> Result<(), SelectionError> {
        let result = self.store.set_year_range(range);
        self.settle(result)
    }

    /// Brush adapter: a pixel span from the timeline, or `None` when the
    /// brush was cleared.
    pub fn brush(&mut self, selection: Option<PixelSpan>) -> Result<(), SelectionError> {
        let result = match selection {
            Some(span) => {
                let range = self
                    .coordinator
                    .borrow()
                    .brush_mapper()
                    .pixel_range_to_year_range(span);
                self.store.set_year_range(range)
            }
            None => self.store.clear_year_range(),
        };
        self.settle(result)
    }

    /// Current brush position in timeline pixels, if the years are narrowed.
    pub fn brush_span(&self) -> Option<PixelSpan> {
        self.coordinator.borrow().brush()
    }

    pub fn stats(&self) -> FilterStats {
        self.coordinator.borrow().stats()
    }

    /// Borrow the coordinator to read the views.
    pub fn views(&self) -> Ref<'_, ViewCoordinator<T, B>> {
        self.coordinator.borrow()
    }
}

impl Dashboard<TimelineChart, BubbleChart> {
    /// Build a dashboard with the default timeline and bubble charts, sized
    /// from `config`.
    pub fn with_charts(dataset: Rc<Dataset>, config: DashboardConfig) -> Result<Self, LoadError> {
        let extent = dataset.year_extent().ok_or(LoadError::NoYears)?;
        let fallback = match config.timeline_min_year {
            Some(min) if (min as f64) <= extent.end => {
                YearRange::new(extent.start.max(min as f64), extent.end)
            }
            _ => extent,
        };
        let timeline = TimelineChart::new(config.timeline_viewport, fallback);
        let bubble = BubbleChart::new(&config);
        Self::new(dataset, config, timeline, bubble)
    }

    pub fn bubble_commands(&self) -> Vec<RenderCommand> {
        self.views().bubble().commands().to_vec()
    }

    pub fn timeline_commands(&self) -> Vec<RenderCommand> {
        self.views().timeline().render()
    }

    /// Both charts as one SVG document, timeline on top.
    pub fn render_svg(&self, dark: bool) -> String {
        let timeline = self.timeline_commands();
        let bubble = self.bubble_commands();
        let width = self
            .config
            .timeline_viewport
            .width
            .max(self.config.bubble_viewport.width);
        svg::render_stacked_svg(
            &[
                (&timeline[..], self.config.timeline_viewport.height),
                (&bubble[..], self.config.bubble_viewport.height),
            ],
            width,
            dark,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilteredRecord;
    use crate::histogram::YearHistogram;
    use crate::model::record::fixtures::record;
    use crate::scale::LinearScale;

    #[derive(Default)]
    struct Timeline {
        updates: usize,
    }

    impl TimelineView for Timeline {
        fn update(&mut self, _records: &[FilteredRecord<'_>], histogram: &YearHistogram) -> LinearScale {
            self.updates += 1;
            let extent = histogram
                .year_extent()
                .unwrap_or(YearRange::from_years(2006, 2025));
            LinearScale::new((extent.start, extent.end), (0.0, 100.0))
        }

        fn set_brush(&mut self, _brush: Option<PixelSpan>) {}
    }

    #[derive(Default)]
    struct Bubble {
        names: Vec<String>,
    }

    impl BubbleView for Bubble {
        fn update(&mut self, records: &[FilteredRecord<'_>], _state: &SelectionState) {
            self.names = records.iter().map(|r| r.record.name.to_string()).collect();
        }
    }

    fn dashboard() -> Dashboard<Timeline, Bubble> {
        let dataset = Rc::new(Dataset::new(vec![
            record("A", &["Indie", "Action"], 1000, 2015),
            record("B", &["Action"], 2000, 2018),
            record("C", &["Indie", "Action"], 100, 2015),
            record("E", &["Indie", "Action"], 800, 2010),
        ]));
        Dashboard::new(
            dataset,
            DashboardConfig::default(),
            Timeline::default(),
            Bubble::default(),
        )
        .unwrap()
    }

    #[test]
    fn initial_render_happens_on_construction() {
        let d = dashboard();
        assert_eq!(d.views().recomputes(), 1);
        assert_eq!(d.views().bubble().names, ["A", "E"]);
        assert_eq!(d.state().year_range, YearRange::from_years(2010, 2018));
    }

    #[test]
    fn each_change_recomputes_once() {
        let mut d = dashboard();
        d.set_compare_mode(true).unwrap();
        assert_eq!(d.views().recomputes(), 2);
        assert_eq!(d.views().timeline().updates, 2);
        assert_eq!(d.views().bubble().names, ["B", "A", "E"]);
        assert_eq!(d.stats().studio, 1);
        assert_eq!(d.stats().indie, 2);
    }

    #[test]
    fn rejected_change_does_not_redraw() {
        let mut d = dashboard();
        assert!(d.set_genres(Vec::<&str>::new()).is_err());
        assert!(d.toggle_genre("Action").is_err());
        assert_eq!(d.views().recomputes(), 1);
        assert!(d.state().required_genres.contains("Action"));
    }

    #[test]
    fn brush_then_clear() {
        let mut d = dashboard();
        // Indie timeline spans 2010..2015 over 0..100 px.
        d.brush(Some(PixelSpan::new(80.0, 100.0))).unwrap();
        let range = d.state().year_range;
        assert!((range.start - 2014.0).abs() < 1e-9);
        assert!((range.end - 2015.0).abs() < 1e-9);
        assert_eq!(d.views().bubble().names, ["A"]);
        assert!(d.brush_span().is_some());

        d.brush(None).unwrap();
        assert_eq!(d.state().year_range, YearRange::from_years(2010, 2018));
        assert_eq!(d.brush_span(), None);
        assert_eq!(d.views().bubble().names, ["A", "E"]);
    }

    #[test]
    fn brush_survives_game_type_switch() {
        let mut d = dashboard();
        d.brush(Some(PixelSpan::new(0.0, 30.0))).unwrap();
        assert_eq!(d.views().bubble().names, ["E"]);

        // The studio timeline only spans 2018; the same pixels now select it.
        d.select_game_type(GameType::Studio).unwrap();
        let Some(span) = d.brush_span() else {
            unreachable!("brush kept across the switch");
        };
        assert!(span.x0.abs() < 1e-9 && (span.x1 - 30.0).abs() < 1e-9);
        let shown = d.views().brush_mapper().pixel_range_to_year_range(span);
        assert_eq!(d.state().year_range, shown);
        assert_eq!(shown, YearRange::from_years(2018, 2018));
        assert_eq!(d.views().bubble().names, ["B"]);
    }

    #[test]
    fn min_radius_respects_slider_bounds() {
        let mut d = dashboard();
        let (lo, hi) = d.config().radius.slider_bounds();
        assert!(d.set_min_radius(lo - 0.5).is_err());
        assert!(d.set_min_radius(hi + 0.5).is_err());
        assert!(d.set_min_radius((lo + hi) / 2.0).is_ok());
        assert_eq!(d.state().radius_extent.min, (lo + hi) / 2.0);
    }

    struct Counter(Rc<RefCell<Vec<SelectionChange>>>);

    impl SelectionListener for Counter {
        fn selection_changed(&mut self, _state: &SelectionState, change: SelectionChange) {
            self.0.borrow_mut().push(change);
        }
    }

    #[test]
    fn chart_dashboard_draws_both_views() {
        let dataset = Rc::new(Dataset::new(vec![
            record("A", &["Indie", "Action"], 1000, 2015),
            record("B", &["Action"], 2000, 2018),
            record("E", &["Indie", "Action"], 800, 2010),
        ]));
        let mut d = ChartDashboard::with_charts(dataset, DashboardConfig::default()).unwrap();
        let circles = |cmds: &[RenderCommand]| {
            cmds.iter()
                .filter(|c| {
                    matches!(
                        c,
                        RenderCommand::DrawCircle {
                            record_index: Some(_),
                            ..
                        }
                    )
                })
                .count()
        };
        assert_eq!(circles(&d.bubble_commands()), 2);
        assert!(!d.timeline_commands().is_empty());

        d.set_compare_mode(true).unwrap();
        assert_eq!(circles(&d.bubble_commands()), 3);

        let svg = d.render_svg(false);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Price (USD)"));
    }

    #[test]
    fn extra_listeners_see_changes() {
        let mut d = dashboard();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = d.subscribe(Rc::new(RefCell::new(Counter(Rc::clone(&seen)))));
        d.select_game_type(GameType::Studio).unwrap();
        assert!(d.unsubscribe(id));
        d.select_game_type(GameType::Indie).unwrap();
        assert_eq!(*seen.borrow(), [SelectionChange::GameType]);
    }
}
