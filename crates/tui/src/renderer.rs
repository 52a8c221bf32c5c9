use bubblescope_protocol::{Point, RenderCommand, TextAlign, ThemeToken, Viewport};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

pub fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::SentimentNegative => Color::Red,
        ThemeToken::SentimentMixed => Color::Yellow,
        ThemeToken::SentimentPositive => Color::Green,
        ThemeToken::SentimentOverwhelming => Color::Cyan,
        ThemeToken::BubbleIndie => Color::LightBlue,
        ThemeToken::BubbleStudio => Color::LightRed,
        ThemeToken::ChartBackground | ThemeToken::Background => Color::Black,
        ThemeToken::AxisLine => Color::Gray,
        ThemeToken::GridLine | ThemeToken::Border => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::TimelineFill => Color::Rgb(105, 179, 162),
        ThemeToken::TimelineIndieLine => Color::LightBlue,
        ThemeToken::BrushFill => Color::Rgb(50, 50, 70),
        ThemeToken::BrushBorder => Color::White,
    }
}

/// Maps chart pixels onto the terminal cells of `area`.
#[derive(Debug, Clone, Copy)]
pub struct CellMapper {
    area: Rect,
    col_scale: f64,
    row_scale: f64,
}

impl CellMapper {
    pub fn new(viewport: &Viewport, area: Rect) -> Self {
        Self {
            area,
            col_scale: f64::from(area.width) / viewport.width.max(1.0),
            row_scale: f64::from(area.height) / viewport.height.max(1.0),
        }
    }

    pub fn cell(&self, p: Point) -> Option<(u16, u16)> {
        let col = (p.x * self.col_scale).floor();
        let row = (p.y * self.row_scale).floor();
        if col < 0.0
            || row < 0.0
            || col >= f64::from(self.area.width)
            || row >= f64::from(self.area.height)
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Chart x coordinate at the centre of terminal column `col`.
    pub fn pixel_x(&self, col: u16) -> f64 {
        (f64::from(col.saturating_sub(self.area.x)) + 0.5) / self.col_scale
    }

    fn pixel_y(&self, row: u16) -> f64 {
        (f64::from(row.saturating_sub(self.area.y)) + 0.5) / self.row_scale
    }
}

/// Paint `commands` into `buf` within `area`.
pub fn render_commands(
    buf: &mut Buffer,
    area: Rect,
    viewport: &Viewport,
    commands: &[RenderCommand],
) {
    let map = CellMapper::new(viewport, area);
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                // Backgrounds only tint; brushes also mark their edges.
                let bg = theme_to_color(*color);
                let (Some((c0, r0)), Some((c1, r1))) = (
                    map.cell(Point::new(rect.x.max(0.0), rect.y.max(0.0))),
                    map.cell(Point::new(rect.right() - 0.01, rect.bottom() - 0.01)),
                ) else {
                    continue;
                };
                for y in r0..=r1 {
                    for x in c0..=c1 {
                        buf[(x, y)].set_bg(bg);
                    }
                }
                if let Some(border) = border_color {
                    let fg = theme_to_color(*border);
                    for y in r0..=r1 {
                        buf[(c0, y)].set_char('▏').set_fg(fg);
                        buf[(c1, y)].set_char('▕').set_fg(fg);
                    }
                }
            }
            RenderCommand::DrawCircle { center, color, .. } => {
                if let Some((x, y)) = map.cell(*center) {
                    buf[(x, y)].set_char('●').set_fg(theme_to_color(*color));
                }
            }
            RenderCommand::DrawPolygon { points, color } => {
                fill_area(buf, &map, points, theme_to_color(*color));
            }
            RenderCommand::DrawLine {
                from, to, color, ..
            } => draw_line(buf, &map, *from, *to, theme_to_color(*color)),
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let Some((x, y)) = map.cell(*position) else {
                    continue;
                };
                let len = text.chars().count() as u16;
                let start = match align {
                    TextAlign::Left => x,
                    TextAlign::Center => x.saturating_sub(len / 2),
                    TextAlign::Right => x.saturating_sub(len),
                }
                .max(area.x);
                let room = (area.x + area.width).saturating_sub(start) as usize;
                buf.set_stringn(
                    start,
                    y,
                    text.as_str(),
                    room,
                    Style::default().fg(theme_to_color(*color)),
                );
            }
            RenderCommand::SetClip { .. }
            | RenderCommand::ClearClip
            | RenderCommand::BeginGroup { .. }
            | RenderCommand::EndGroup => {}
        }
    }
}

fn draw_line(buf: &mut Buffer, map: &CellMapper, from: Point, to: Point, fg: Color) {
    let (Some((x0, y0)), Some((x1, y1))) = (map.cell(from), map.cell(to)) else {
        return;
    };
    if y0 == y1 {
        for x in x0.min(x1)..=x0.max(x1) {
            buf[(x, y0)].set_char('─').set_fg(fg);
        }
    } else if x0 == x1 {
        for y in y0.min(y1)..=y0.max(y1) {
            buf[(x0, y)].set_char('│').set_fg(fg);
        }
    } else {
        // Diagonal: one mark per column.
        let (a, b) = if x0 <= x1 { (from, to) } else { (to, from) };
        for x in x0.min(x1)..=x0.max(x1) {
            let px = map.pixel_x(x);
            let t = ((px - a.x) / (b.x - a.x)).clamp(0.0, 1.0);
            if let Some((cx, cy)) = map.cell(Point::new(px, a.y + t * (b.y - a.y))) {
                buf[(cx, cy)].set_char('•').set_fg(fg);
            }
        }
    }
}

/// Fill under the upper edge of an area polygon whose first and last points
/// sit on the baseline.
fn fill_area(buf: &mut Buffer, map: &CellMapper, points: &[Point], fg: Color) {
    let [first, edge @ .., last] = points else {
        return;
    };
    let baseline = first.y;
    let (Some((c0, _)), Some((c1, _))) = (
        map.cell(Point::new(first.x, baseline - 0.01)),
        map.cell(Point::new(last.x, baseline - 0.01)),
    ) else {
        return;
    };
    for col in c0..=c1 {
        let px = map.pixel_x(col);
        let Some(top) = upper_edge_at(edge, px) else {
            continue;
        };
        let mut row = map.area.y;
        while row < map.area.y + map.area.height {
            let py = map.pixel_y(row);
            if py >= top && py <= baseline {
                buf[(col, row)].set_char('█').set_fg(fg);
            }
            row += 1;
        }
    }
}

fn upper_edge_at(edge: &[Point], x: f64) -> Option<f64> {
    match edge {
        [] => None,
        [only] => Some(only.y),
        _ => edge.windows(2).find_map(|w| {
            let (a, b) = (w[0], w[1]);
            if x < a.x.min(b.x) || x > a.x.max(b.x) {
                return None;
            }
            if b.x == a.x {
                return Some(a.y.min(b.y));
            }
            Some(a.y + (x - a.x) / (b.x - a.x) * (b.y - a.y))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport::new(100.0, 50.0)
    }

    #[test]
    fn circle_lands_in_scaled_cell() {
        let area = Rect::new(0, 0, 50, 25);
        let mut buf = Buffer::empty(area);
        let cmds = [RenderCommand::DrawCircle {
            center: Point::new(20.0, 10.0),
            radius: 3.0,
            color: ThemeToken::BubbleIndie,
            opacity: 0.7,
            label: None,
            record_index: Some(0),
        }];
        render_commands(&mut buf, area, &vp(), &cmds);
        assert_eq!(buf[(10, 5)].symbol(), "●");
        assert_eq!(buf[(10, 5)].fg, Color::LightBlue);
    }

    #[test]
    fn out_of_area_commands_are_ignored() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        let cmds = [RenderCommand::DrawCircle {
            center: Point::new(500.0, 10.0),
            radius: 3.0,
            color: ThemeToken::BubbleIndie,
            opacity: 0.7,
            label: None,
            record_index: None,
        }];
        render_commands(&mut buf, area, &vp(), &cmds);
        assert!((0..10).all(|x| (0..5).all(|y| buf[(x, y)].symbol() == " ")));
    }

    #[test]
    fn text_is_clipped_to_area() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        let cmds = [RenderCommand::DrawText {
            position: Point::new(80.0, 20.0),
            text: "Price (USD)".into(),
            color: ThemeToken::TextPrimary,
            font_size: 12.0,
            align: TextAlign::Left,
        }];
        render_commands(&mut buf, area, &vp(), &cmds);
        assert_eq!(buf[(8, 2)].symbol(), "P");
        assert_eq!(buf[(9, 2)].symbol(), "r");
    }

    #[test]
    fn area_fills_down_to_baseline() {
        let area = Rect::new(0, 0, 10, 10);
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 10));
        let viewport = Viewport::new(10.0, 10.0);
        let cmds = [RenderCommand::DrawPolygon {
            points: vec![
                Point::new(0.0, 10.0),
                Point::new(0.0, 2.0),
                Point::new(9.0, 2.0),
                Point::new(9.0, 10.0),
            ],
            color: ThemeToken::TimelineFill,
        }];
        render_commands(&mut buf, area, &viewport, &cmds);
        assert_eq!(buf[(4, 1)].symbol(), " ");
        assert_eq!(buf[(4, 5)].symbol(), "█");
        assert_eq!(buf[(4, 9)].symbol(), "█");
    }

    #[test]
    fn pixel_x_inverts_cell() {
        let map = CellMapper::new(&vp(), Rect::new(5, 0, 50, 25));
        let x = map.pixel_x(15);
        assert_eq!(map.cell(Point::new(x, 0.0)), Some((15, 0)));
    }
}
