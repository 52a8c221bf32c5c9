use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::brush::{BrushMapper, PixelSpan};
use crate::filter::{self, FilterOutput, FilteredRecord};
use crate::histogram::YearHistogram;
use crate::model::{Category, Dataset, YearRange};
use crate::scale::LinearScale;
use crate::state::{SelectionChange, SelectionListener, SelectionState};

/// The releases-per-year view with the brush.
pub trait TimelineView {
    /// Redraw from the year-agnostic record set and its histogram. Returns
    /// the time scale the view now draws with.
    fn update(&mut self, records: &[FilteredRecord<'_>], histogram: &YearHistogram) -> LinearScale;

    /// Move the brush overlay; `None` hides it.
    fn set_brush(&mut self, brush: Option<PixelSpan>);
}

/// The price / positive-rate bubble scatter.
pub trait BubbleView {
    /// Redraw from the fully filtered, year-bounded record set.
    fn update(&mut self, records: &[FilteredRecord<'_>], state: &SelectionState);
}

/// Record counts from the latest recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub timeline: usize,
    pub indie: usize,
    pub studio: usize,
}

impl FilterStats {
    pub fn bubble_total(&self) -> usize {
        self.indie + self.studio
    }
}

/// Recomputes the filtered sets once per selection change and pushes them
/// to the views.
///
/// The brush lives here as a pixel span. Order matters: the timeline
/// redraws first and hands back its new scale, the brush mapper is rebuilt
/// from that scale, and only then is the year interval derived from the
/// brush. A year-range change places the brush over the requested years; any
/// other change keeps the brush where it is drawn and re-inverts it through
/// the fresh scale, so the bubbles always cover what the brush shows.
pub struct ViewCoordinator<T, B> {
    dataset: Rc<Dataset>,
    timeline_min_year: Option<i32>,
    timeline: T,
    bubble: B,
    mapper: BrushMapper,
    brush: Option<PixelSpan>,
    /// Interval the bubble view was last filtered by.
    years: YearRange,
    stats: FilterStats,
    recomputes: u64,
}

impl<T: TimelineView, B: BubbleView> ViewCoordinator<T, B> {
    pub fn new(
        dataset: Rc<Dataset>,
        year_bounds: YearRange,
        timeline_min_year: Option<i32>,
        timeline: T,
        bubble: B,
    ) -> Self {
        let scale = LinearScale::new((year_bounds.start, year_bounds.end), (0.0, 1.0));
        Self {
            dataset,
            timeline_min_year,
            timeline,
            bubble,
            mapper: BrushMapper::new(scale, year_bounds),
            brush: None,
            years: year_bounds,
            stats: FilterStats::default(),
            recomputes: 0,
        }
    }

    pub fn on_state_change(&mut self, state: &SelectionState, change: SelectionChange) {
        let timeline = match filter::compute_timeline(self.dataset.records(), state) {
            Ok(timeline) => timeline,
            Err(err) => {
                warn!(%err, "keeping previous views");
                return;
            }
        };
        self.recomputes += 1;

        let histogram = YearHistogram::from_records(&timeline, self.timeline_min_year);
        let scale = self.timeline.update(&timeline, &histogram);
        let rescaled = scale != *self.mapper.scale();
        self.mapper = BrushMapper::new(scale, self.mapper.year_bounds());

        if change == SelectionChange::YearRange {
            self.brush = self.mapper.brush_for(state.year_range);
            self.years = match self.brush {
                Some(_) => state
                    .year_range
                    .clamp_to(&self.mapper.visible_years())
                    .clamp_to(&self.mapper.year_bounds()),
                None => self.mapper.year_bounds(),
            };
        } else if rescaled {
            self.years = self.mapper.selection_to_year_range(self.brush);
        }
        self.timeline.set_brush(self.brush);

        let bubble = filter::narrow_to_years(&timeline, self.years);
        let mut drawn = state.clone();
        drawn.year_range = self.years;
        self.bubble.update(&bubble, &drawn);

        let output = FilterOutput { timeline, bubble };
        self.stats = FilterStats {
            timeline: output.timeline.len(),
            indie: output.bubble_count(Category::Indie),
            studio: output.bubble_count(Category::Studio),
        };
        debug!(
            ?change,
            timeline = self.stats.timeline,
            indie = self.stats.indie,
            studio = self.stats.studio,
            years = %self.years,
            "views updated"
        );
    }

    pub fn brush_mapper(&self) -> &BrushMapper {
        &self.mapper
    }

    /// Brush position in timeline pixels, if the years are narrowed.
    pub fn brush(&self) -> Option<PixelSpan> {
        self.brush
    }

    /// Year interval behind the current bubble set.
    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Number of times the filtered sets were recomputed.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    pub fn timeline(&self) -> &T {
        &self.timeline
    }

    pub fn bubble(&self) -> &B {
        &self.bubble
    }

    pub fn timeline_mut(&mut self) -> &mut T {
        &mut self.timeline
    }

    pub fn bubble_mut(&mut self) -> &mut B {
        &mut self.bubble
    }
}

impl<T: TimelineView, B: BubbleView> SelectionListener for ViewCoordinator<T, B> {
    fn selection_changed(&mut self, state: &SelectionState, change: SelectionChange) {
        self.on_state_change(state, change);
    }
}
