use bubblescope_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::scale::LinearScale;

const TICK_LENGTH: f64 = 6.0;
const FONT_SIZE: f64 = 10.0;
const TITLE_FONT_SIZE: f64 = 12.0;
const MIN_TICK_SPACING_PX: f64 = 80.0;

/// How many ticks fit along `length_px` pixels without labels colliding.
pub fn tick_count_for(length_px: f64) -> usize {
    ((length_px / MIN_TICK_SPACING_PX).floor() as usize).max(2)
}

/// Render a horizontal axis along the bottom edge of `plot`.
///
/// Ticks come from `scale` (domain values, range in pixels). When
/// `gridlines` is set, each tick also gets a faint vertical line across the
/// plot.
pub fn render_x_axis(
    scale: &LinearScale,
    plot: &Rect,
    ticks: usize,
    format: impl Fn(f64) -> String,
    title: Option<&str>,
    gridlines: bool,
) -> Vec<RenderCommand> {
    let baseline = plot.bottom();
    let mut commands = Vec::with_capacity(ticks * 3 + 2);

    commands.push(RenderCommand::DrawLine {
        from: Point::new(plot.x, baseline),
        to: Point::new(plot.right(), baseline),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });

    for t in scale.ticks(ticks) {
        let x = scale.map(t);
        if gridlines {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, plot.y),
                to: Point::new(x, baseline),
                color: ThemeToken::GridLine,
                width: 0.5,
            });
        }
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, baseline),
            to: Point::new(x, baseline + TICK_LENGTH),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, baseline + TICK_LENGTH + FONT_SIZE + 2.0),
            text: SharedStr::from(format(t)),
            color: ThemeToken::TextSecondary,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    if let Some(title) = title {
        commands.push(RenderCommand::DrawText {
            position: Point::new(plot.x + plot.w / 2.0, baseline + 36.0),
            text: title.into(),
            color: ThemeToken::TextPrimary,
            font_size: TITLE_FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands
}

/// Render a vertical axis along the left edge of `plot`.
pub fn render_y_axis(
    scale: &LinearScale,
    plot: &Rect,
    ticks: usize,
    format: impl Fn(f64) -> String,
    title: Option<&str>,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(ticks * 2 + 2);

    commands.push(RenderCommand::DrawLine {
        from: Point::new(plot.x, plot.y),
        to: Point::new(plot.x, plot.bottom()),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });

    for t in scale.ticks(ticks) {
        let y = scale.map(t);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(plot.x - TICK_LENGTH, y),
            to: Point::new(plot.x, y),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(plot.x - TICK_LENGTH - 2.0, y + FONT_SIZE / 3.0),
            text: SharedStr::from(format(t)),
            color: ThemeToken::TextSecondary,
            font_size: FONT_SIZE,
            align: TextAlign::Right,
        });
    }

    if let Some(title) = title {
        commands.push(RenderCommand::DrawText {
            position: Point::new(plot.x - 50.0, plot.y - 10.0),
            text: title.into(),
            color: ThemeToken::TextPrimary,
            font_size: TITLE_FONT_SIZE,
            align: TextAlign::Left,
        });
    }

    commands
}

/// Format a year tick: whole years only, no thousands separator.
pub fn format_year(year: f64) -> String {
    format!("{:.0}", year)
}

pub fn format_price(usd: f64) -> String {
    if usd.fract() == 0.0 {
        format!("${:.0}", usd)
    } else {
        format!("${:.2}", usd)
    }
}

pub fn format_percent(p: f64) -> String {
    format!("{:.0}%", p)
}

pub fn format_count(n: f64) -> String {
    let n = n.round();
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}k", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}
