use serde::{Deserialize, Serialize};

use crate::model::YearRange;
use crate::scale::LinearScale;

/// A horizontal brush selection in timeline pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSpan {
    pub x0: f64,
    pub x1: f64,
}

impl PixelSpan {
    /// Build a span, ordering the endpoints.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { x0: a, x1: b }
        } else {
            Self { x0: b, x1: a }
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Converts between brush pixels and release years.
///
/// The scale is the one the timeline last drew with; it is built from the
/// timeline's own record subset, so it must be replaced every time the
/// timeline redraws. `year_bounds` is the dataset's full extent and is what
/// a missing brush means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushMapper {
    scale: LinearScale,
    year_bounds: YearRange,
}

impl BrushMapper {
    pub fn new(scale: LinearScale, year_bounds: YearRange) -> Self {
        Self { scale, year_bounds }
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn year_bounds(&self) -> YearRange {
        self.year_bounds
    }

    /// Years the timeline currently draws.
    pub fn visible_years(&self) -> YearRange {
        YearRange::new(self.scale.domain.0, self.scale.domain.1)
    }

    pub fn pixel_range_to_year_range(&self, span: PixelSpan) -> YearRange {
        let span = PixelSpan::new(span.x0, span.x1);
        let a = self.scale.invert(self.scale.clamp_pixel(span.x0));
        let b = self.scale.invert(self.scale.clamp_pixel(span.x1));
        YearRange::new(a, b).clamp_to(&self.year_bounds)
    }

    pub fn year_range_to_pixel_range(&self, range: YearRange) -> PixelSpan {
        PixelSpan::new(self.scale.map(range.start), self.scale.map(range.end))
    }

    /// Year interval selected by the brush; no brush selects everything.
    pub fn selection_to_year_range(&self, selection: Option<PixelSpan>) -> YearRange {
        match selection {
            Some(span) => self.pixel_range_to_year_range(span),
            None => self.year_bounds,
        }
    }

    /// Where the brush should sit for `range`, or `None` when the range is
    /// the full extent (nothing brushed). Years outside the drawn domain
    /// pin the brush to the plot edge.
    pub fn brush_for(&self, range: YearRange) -> Option<PixelSpan> {
        if range == self.year_bounds {
            return None;
        }
        let span = self.year_range_to_pixel_range(range);
        Some(PixelSpan::new(
            self.scale.clamp_pixel(span.x0),
            self.scale.clamp_pixel(span.x1),
        ))
    }
}
