use bubblescope_protocol::{
    Margin, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport,
};

use super::axis;
use crate::config::DashboardConfig;
use crate::coordinator::BubbleView;
use crate::filter::FilteredRecord;
use crate::model::{Category, Record};
use crate::scale::{self, LinearScale, SqrtScale};
use crate::state::SelectionState;

pub const BUBBLE_MARGIN: Margin = Margin::new(40.0, 40.0, 60.0, 70.0);
const BUBBLE_OPACITY: f64 = 0.7;
const FALLBACK_MAX_PRICE: f64 = 50.0;
const FALLBACK_MAX_POSITIVE: f64 = 100.0;
const EMPTY_MESSAGE: &str = "No games match the current filters";

/// A drawn bubble, kept for hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleHit {
    pub center: Point,
    pub radius: f64,
    /// Position of the record in the dataset.
    pub index: usize,
}

/// Price against positive-review share, one circle per game, sized by
/// review count.
pub struct BubbleChart {
    viewport: Viewport,
    margin: Margin,
    /// Review counts mapped to the ends of the radius extent.
    review_domain: (f64, f64),
    commands: Vec<RenderCommand>,
    hits: Vec<BubbleHit>,
}

impl BubbleChart {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            viewport: config.bubble_viewport,
            margin: BUBBLE_MARGIN,
            review_domain: (
                config.min_review_threshold as f64,
                config.radius.max_reviews as f64,
            ),
            commands: Vec::new(),
            hits: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Commands from the latest update.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn hits(&self) -> &[BubbleHit] {
        &self.hits
    }

    /// Dataset index of the topmost bubble under `point`.
    pub fn record_at(&self, point: Point) -> Option<usize> {
        self.hits
            .iter()
            .rev()
            .find(|h| {
                let dx = h.center.x - point.x;
                let dy = h.center.y - point.y;
                dx * dx + dy * dy <= h.radius * h.radius
            })
            .map(|h| h.index)
    }

    fn plot(&self) -> Rect {
        self.margin.inner(&self.viewport)
    }
}

impl BubbleView for BubbleChart {
    fn update(&mut self, records: &[FilteredRecord<'_>], state: &SelectionState) {
        let plot = self.plot();
        let max_price = scale::max_finite(records.iter().map(|r| r.record.price))
            .filter(|m| *m > 0.0)
            .unwrap_or(FALLBACK_MAX_PRICE);
        let max_positive = scale::max_finite(records.iter().map(|r| r.record.positive_rate))
            .filter(|m| *m > 0.0)
            .unwrap_or(FALLBACK_MAX_POSITIVE);

        let x = LinearScale::new((0.0, max_price), (plot.x, plot.right()));
        let y = LinearScale::new((0.0, max_positive), (plot.bottom(), plot.y));
        let r = SqrtScale::new(
            self.review_domain,
            (state.radius_extent.min, state.radius_extent.max),
        );

        let mut commands = Vec::with_capacity(records.len() + 64);
        let mut hits = Vec::with_capacity(records.len());

        commands.push(RenderCommand::BeginGroup {
            id: "bubble-chart".into(),
            label: Some("Bubble chart".into()),
        });
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height),
            color: ThemeToken::ChartBackground,
            border_color: None,
            label: None,
        });

        commands.extend(axis::render_x_axis(
            &x,
            &plot,
            axis::tick_count_for(plot.w),
            axis::format_price,
            Some("Price (USD)"),
            true,
        ));
        commands.extend(axis::render_y_axis(
            &y,
            &plot,
            axis::tick_count_for(plot.h).min(10),
            axis::format_percent,
            Some("Positive Percentual (%)"),
        ));

        commands.push(RenderCommand::SetClip { rect: plot });
        for fr in records {
            let rec = fr.record;
            if !(rec.price.is_finite() && rec.positive_rate.is_finite()) {
                continue;
            }
            let reviews = (rec.review_key() as f64).min(self.review_domain.1);
            let center = Point::new(x.map(rec.price), y.map(rec.positive_rate));
            let radius = r.map(reviews).max(0.0);
            commands.push(RenderCommand::DrawCircle {
                center,
                radius,
                color: bubble_color(fr, state.compare_mode),
                opacity: BUBBLE_OPACITY,
                label: Some(tooltip(rec)),
                record_index: Some(fr.index),
            });
            hits.push(BubbleHit {
                center,
                radius,
                index: fr.index,
            });
        }
        commands.push(RenderCommand::ClearClip);

        if hits.is_empty() {
            commands.push(RenderCommand::DrawText {
                position: Point::new(plot.x + plot.w / 2.0, plot.y + plot.h / 2.0),
                text: EMPTY_MESSAGE.into(),
                color: ThemeToken::TextMuted,
                font_size: 14.0,
                align: TextAlign::Center,
            });
        }

        if state.compare_mode {
            commands.extend(legend(&plot));
        }

        commands.push(RenderCommand::EndGroup);
        self.commands = commands;
        self.hits = hits;
    }
}

fn bubble_color(fr: &FilteredRecord<'_>, compare_mode: bool) -> ThemeToken {
    if compare_mode {
        match fr.category {
            Category::Indie => ThemeToken::BubbleIndie,
            Category::Studio => ThemeToken::BubbleStudio,
        }
    } else {
        ThemeToken::for_positive_rate(fr.record.positive_rate)
    }
}

/// Hover text: name, price, positive share and review count.
pub fn tooltip(record: &Record) -> SharedStr {
    let reviews = record
        .review_count
        .map_or_else(|| "n/a".to_string(), |n| n.to_string());
    format!(
        "{}\nPrice: ${}\nPositive: {}%\nReviews: {}",
        record.name, record.price, record.positive_rate, reviews
    )
    .into()
}

fn legend(plot: &Rect) -> Vec<RenderCommand> {
    let x = plot.right() - 90.0;
    let mut commands = Vec::with_capacity(4);
    for (row, (category, token)) in [
        (Category::Indie, ThemeToken::BubbleIndie),
        (Category::Studio, ThemeToken::BubbleStudio),
    ]
    .into_iter()
    .enumerate()
    {
        let y = plot.y + 12.0 + row as f64 * 18.0;
        commands.push(RenderCommand::DrawCircle {
            center: Point::new(x, y),
            radius: 5.0,
            color: token,
            opacity: 1.0,
            label: None,
            record_index: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + 10.0, y + 4.0),
            text: category.label().into(),
            color: ThemeToken::TextPrimary,
            font_size: 11.0,
            align: TextAlign::Left,
        });
    }
    commands
}
