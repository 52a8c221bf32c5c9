//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use bubblescope_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    ));

    let bg = resolve_color(ThemeToken::Background, dark);
    svg.push_str(&format!(r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#));

    let mut clip_id = 0usize;
    let mut clip_open = false;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
            } => {
                let fill = resolve_color(*color, dark);
                let opacity = fill_opacity(*color);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" fill-opacity="{opacity}""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(border) = border_color {
                    svg.push_str(&format!(r#" stroke="{}""#, resolve_color(*border, dark)));
                }
                svg.push('>');
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                opacity,
                label,
                ..
            } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{fill}" opacity="{opacity}">"#,
                    center.x, center.y,
                ));
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</circle>");
            }
            RenderCommand::DrawPolygon { points, color } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<polygon points="{}" fill="{fill}" fill-opacity="{}"/>"#,
                    polygon_points(points),
                    fill_opacity(*color),
                ));
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::SetClip { rect } => {
                if clip_open {
                    svg.push_str("</g>");
                }
                clip_id += 1;
                svg.push_str(&format!(
                    r#"<clipPath id="clip{clip_id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip{clip_id})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                clip_open = true;
            }
            RenderCommand::ClearClip => {
                if clip_open {
                    svg.push_str("</g>");
                    clip_open = false;
                }
            }
            RenderCommand::BeginGroup { id, .. } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    if clip_open {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

/// Stack several chart command lists vertically into one document.
pub fn render_stacked_svg(charts: &[(&[RenderCommand], f64)], width: f64, dark: bool) -> String {
    let height: f64 = charts.iter().map(|(_, h)| h).sum();
    let mut merged = Vec::new();
    let mut offset = 0.0;
    for (commands, h) in charts {
        merged.extend(commands.iter().map(|c| translate(c, offset)));
        offset += h;
    }
    render_svg(&merged, width, height, dark)
}

fn translate(cmd: &RenderCommand, dy: f64) -> RenderCommand {
    let shift = |p: &Point| Point::new(p.x, p.y + dy);
    let mut cmd = cmd.clone();
    match &mut cmd {
        RenderCommand::DrawRect { rect, .. } | RenderCommand::SetClip { rect } => rect.y += dy,
        RenderCommand::DrawCircle { center, .. } => *center = shift(center),
        RenderCommand::DrawPolygon { points, .. } => {
            for p in points.iter_mut() {
                *p = shift(p);
            }
        }
        RenderCommand::DrawText { position, .. } => *position = shift(position),
        RenderCommand::DrawLine { from, to, .. } => {
            *from = shift(from);
            *to = shift(to);
        }
        RenderCommand::ClearClip | RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
    }
    cmd
}

fn polygon_points(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{},{}", p.x, p.y));
    }
    out
}

fn fill_opacity(token: ThemeToken) -> f64 {
    match token {
        ThemeToken::BrushFill => 0.3,
        ThemeToken::TimelineFill => 0.8,
        _ => 1.0,
    }
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::SentimentNegative => "#ef5350",
            ThemeToken::SentimentMixed => "#ffca28",
            ThemeToken::SentimentPositive => "#26a69a",
            ThemeToken::SentimentOverwhelming => "#7e57c2",
            ThemeToken::BubbleIndie => "#42a5f5",
            ThemeToken::BubbleStudio => "#ffa726",
            ThemeToken::ChartBackground | ThemeToken::Background => "#181818",
            ThemeToken::AxisLine => "#9e9e9e",
            ThemeToken::GridLine | ThemeToken::Border => "#303030",
            ThemeToken::TextPrimary => "#ececec",
            ThemeToken::TextSecondary | ThemeToken::TextMuted => "#9e9e9e",
            ThemeToken::TimelineFill => "#5c6bc0",
            ThemeToken::TimelineIndieLine => "#42a5f5",
            ThemeToken::BrushFill => "#90caf9",
            ThemeToken::BrushBorder => "#e3f2fd",
        }
    } else {
        match token {
            ThemeToken::SentimentNegative => "#440154",
            ThemeToken::SentimentMixed => "#31688e",
            ThemeToken::SentimentPositive => "#35b779",
            ThemeToken::SentimentOverwhelming => "#fde725",
            ThemeToken::BubbleIndie => "#1f77b4",
            ThemeToken::BubbleStudio => "#ff7f0e",
            ThemeToken::ChartBackground | ThemeToken::Background => "#ffffff",
            ThemeToken::AxisLine => "#333333",
            ThemeToken::GridLine | ThemeToken::Border => "#e5e5e5",
            ThemeToken::TextPrimary => "#333333",
            ThemeToken::TextSecondary | ThemeToken::TextMuted => "#666677",
            ThemeToken::TimelineFill => "#69b3a2",
            ThemeToken::TimelineIndieLine => "#1f77b4",
            ThemeToken::BrushFill => "#777777",
            ThemeToken::BrushBorder => "#333333",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
