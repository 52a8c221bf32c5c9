use bubblescope_protocol::{Margin, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use super::axis;
use crate::brush::PixelSpan;
use crate::coordinator::TimelineView;
use crate::filter::FilteredRecord;
use crate::histogram::YearHistogram;
use crate::model::YearRange;
use crate::scale::LinearScale;

pub const TIMELINE_MARGIN: Margin = Margin::new(20.0, 40.0, 20.0, 40.0);
const HANDLE_WIDTH: f64 = 3.0;
const EMPTY_MESSAGE: &str = "No releases match the current filters";

/// Releases per year as a filled area, with the brush drawn on top.
///
/// The x scale covers the years present in the current histogram. With no
/// releases at all it falls back to `fallback_years` so the frame and the
/// brush still have a domain.
pub struct TimelineChart {
    viewport: Viewport,
    margin: Margin,
    fallback_years: YearRange,
    scale: LinearScale,
    base: Vec<RenderCommand>,
    brush: Option<PixelSpan>,
}

impl TimelineChart {
    pub fn new(viewport: Viewport, fallback_years: YearRange) -> Self {
        let plot = TIMELINE_MARGIN.inner(&viewport);
        Self {
            viewport,
            margin: TIMELINE_MARGIN,
            fallback_years,
            scale: LinearScale::new(
                (fallback_years.start, fallback_years.end),
                (plot.x, plot.right()),
            ),
            base: Vec::new(),
            brush: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn brush(&self) -> Option<PixelSpan> {
        self.brush
    }

    /// The plotting area, where brush gestures are accepted.
    pub fn plot(&self) -> Rect {
        self.margin.inner(&self.viewport)
    }

    /// Chart plus brush overlay.
    pub fn render(&self) -> Vec<RenderCommand> {
        let mut commands = Vec::with_capacity(self.base.len() + 6);
        commands.extend(self.base.iter().cloned());
        if let Some(span) = self.brush {
            commands.extend(brush_overlay(span, &self.plot()));
        }
        commands.push(RenderCommand::EndGroup);
        commands
    }
}

impl TimelineView for TimelineChart {
    fn update(&mut self, records: &[FilteredRecord<'_>], histogram: &YearHistogram) -> LinearScale {
        let plot = self.plot();
        let years = histogram.year_extent().unwrap_or(self.fallback_years);
        let x = LinearScale::new((years.start, years.end), (plot.x, plot.right()));
        let max_count = histogram.max_count().max(1) as f64;
        let y = LinearScale::new((0.0, max_count), (plot.bottom(), plot.y));

        let mut commands = Vec::with_capacity(histogram.bins.len() * 2 + 32);
        commands.push(RenderCommand::BeginGroup {
            id: "timeline".into(),
            label: Some("Releases per year".into()),
        });
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height),
            color: ThemeToken::ChartBackground,
            border_color: None,
            label: None,
        });

        if !histogram.is_empty() {
            let mut area = Vec::with_capacity(histogram.bins.len() + 2);
            area.push(Point::new(x.map(years.start), plot.bottom()));
            area.extend(
                histogram
                    .bins
                    .iter()
                    .map(|b| Point::new(x.map(b.year as f64), y.map(b.total() as f64))),
            );
            area.push(Point::new(x.map(years.end), plot.bottom()));
            commands.push(RenderCommand::DrawPolygon {
                points: area,
                color: ThemeToken::TimelineFill,
            });

            // Both populations present: trace the indie share on top.
            let mixed = histogram.bins.iter().any(|b| b.studio > 0)
                && histogram.bins.iter().any(|b| b.indie > 0);
            if mixed {
                for pair in histogram.bins.windows(2) {
                    commands.push(RenderCommand::DrawLine {
                        from: Point::new(x.map(pair[0].year as f64), y.map(pair[0].indie as f64)),
                        to: Point::new(x.map(pair[1].year as f64), y.map(pair[1].indie as f64)),
                        color: ThemeToken::TimelineIndieLine,
                        width: 1.5,
                    });
                }
            }
        }

        let year_ticks = axis::tick_count_for(plot.w).min(years.span().max(1.0) as usize + 1);
        commands.extend(axis::render_x_axis(
            &x,
            &plot,
            year_ticks,
            axis::format_year,
            None,
            false,
        ));
        commands.extend(axis::render_y_axis(&y, &plot, 2, axis::format_count, None));

        if histogram.is_empty() {
            // Games can pass the filters yet predate the timeline.
            let text = if records.is_empty() {
                EMPTY_MESSAGE.to_string()
            } else {
                format!(
                    "{} matching games, none released since {:.0}",
                    records.len(),
                    years.start
                )
            };
            commands.push(RenderCommand::DrawText {
                position: Point::new(plot.x + plot.w / 2.0, plot.y + plot.h / 2.0),
                text: text.into(),
                color: ThemeToken::TextMuted,
                font_size: 12.0,
                align: TextAlign::Center,
            });
        }

        self.base = commands;
        self.scale = x;
        x
    }

    fn set_brush(&mut self, brush: Option<PixelSpan>) {
        self.brush = brush;
    }
}

fn brush_overlay(span: PixelSpan, plot: &Rect) -> [RenderCommand; 3] {
    [
        RenderCommand::DrawRect {
            rect: Rect::new(span.x0, plot.y, span.width(), plot.h),
            color: ThemeToken::BrushFill,
            border_color: Some(ThemeToken::BrushBorder),
            label: None,
        },
        RenderCommand::DrawLine {
            from: Point::new(span.x0, plot.y),
            to: Point::new(span.x0, plot.bottom()),
            color: ThemeToken::BrushBorder,
            width: HANDLE_WIDTH,
        },
        RenderCommand::DrawLine {
            from: Point::new(span.x1, plot.y),
            to: Point::new(span.x1, plot.bottom()),
            color: ThemeToken::BrushBorder,
            width: HANDLE_WIDTH,
        },
    ]
}
