use bubblescope_protocol::{Point, RenderCommand, TextAlign, ThemeToken, Viewport};
use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Shape, Stroke, StrokeKind};

use crate::theme::{self, ThemeMode};

/// Maps chart pixels (laid out for a `Viewport`) onto a screen rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    pub fn fit(viewport: &Viewport, screen: Rect) -> Self {
        Self {
            tx: f64::from(screen.left()),
            ty: f64::from(screen.top()),
            sx: f64::from(screen.width()) / viewport.width.max(1.0),
            sy: f64::from(screen.height()) / viewport.height.max(1.0),
        }
    }

    fn apply_x(&self, x: f64) -> f32 {
        (x * self.sx + self.tx) as f32
    }

    fn apply_y(&self, y: f64) -> f32 {
        (y * self.sy + self.ty) as f32
    }

    fn apply(&self, p: Point) -> Pos2 {
        Pos2::new(self.apply_x(p.x), self.apply_y(p.y))
    }

    fn scale_w(&self, w: f64) -> f32 {
        (w * self.sx) as f32
    }

    fn scale_h(&self, h: f64) -> f32 {
        (h * self.sy) as f32
    }

    /// Chart x coordinate under screen x.
    pub fn invert_x(&self, x: f32) -> f64 {
        (f64::from(x) - self.tx) / self.sx
    }
}

/// A drawn bubble, for hover lookups.
pub struct HitRegion {
    pub center: Pos2,
    pub radius: f32,
    pub record_index: usize,
}

/// Result of rendering a command list: includes hit regions for interaction.
pub struct RenderResult {
    pub hit_regions: Vec<HitRegion>,
}

impl RenderResult {
    /// Topmost bubble under `pos`.
    pub fn hit(&self, pos: Pos2) -> Option<usize> {
        self.hit_regions
            .iter()
            .rev()
            .find(|h| h.center.distance(pos) <= h.radius.max(2.0))
            .map(|h| h.record_index)
    }
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// Returns hit regions for hover interaction.
pub fn render_commands(
    painter: &mut egui::Painter,
    commands: &[RenderCommand],
    tf: Transform,
    mode: ThemeMode,
) -> RenderResult {
    let mut clip_stack: Vec<Rect> = Vec::new();
    let mut hit_regions: Vec<HitRegion> = Vec::new();

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
            } => {
                let w = tf.scale_w(rect.w);
                let h = tf.scale_h(rect.h);
                if w < 0.5 || h < 0.5 {
                    continue;
                }
                let egui_rect = Rect::from_min_size(
                    Pos2::new(tf.apply_x(rect.x), tf.apply_y(rect.y)),
                    egui::vec2(w, h),
                );
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }

                painter.rect_filled(egui_rect, CornerRadius::ZERO, theme::resolve(*color, mode));
                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        CornerRadius::ZERO,
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }
                if let Some(label_text) = label {
                    painter.text(
                        egui_rect.left_top() + egui::vec2(3.0, 2.0),
                        Align2::LEFT_TOP,
                        label_text.as_str(),
                        FontId::proportional(10.0),
                        theme::resolve(ThemeToken::TextPrimary, mode),
                    );
                }
            }

            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                opacity,
                record_index,
                ..
            } => {
                let c = tf.apply(*center);
                // Uniform scale keeps bubbles round.
                let r = (*radius * tf.sx.min(tf.sy)) as f32;
                painter.circle_filled(c, r, theme::resolve_with_opacity(*color, mode, *opacity));
                if let Some(index) = record_index {
                    hit_regions.push(HitRegion {
                        center: c,
                        radius: r,
                        record_index: *index,
                    });
                }
            }

            RenderCommand::DrawPolygon { points, color } => {
                if points.len() < 3 {
                    continue;
                }
                // The area polygon is concave; fill it as vertical strips.
                let fill = theme::resolve(*color, mode);
                let screen: Vec<Pos2> = points.iter().map(|p| tf.apply(*p)).collect();
                let baseline = screen[0].y;
                for pair in screen[1..screen.len() - 1].windows(2) {
                    painter.add(Shape::convex_polygon(
                        vec![
                            Pos2::new(pair[0].x, baseline),
                            pair[0],
                            pair[1],
                            Pos2::new(pair[1].x, baseline),
                        ],
                        fill,
                        Stroke::NONE,
                    ));
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_BOTTOM,
                    TextAlign::Center => Align2::CENTER_BOTTOM,
                    TextAlign::Right => Align2::RIGHT_BOTTOM,
                };
                painter.text(
                    tf.apply(*position),
                    anchor,
                    text.as_str(),
                    FontId::proportional(size),
                    theme::resolve(*color, mode),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [tf.apply(*from), tf.apply(*to)],
                    Stroke::new(*width as f32, theme::resolve(*color, mode)),
                );
            }

            RenderCommand::SetClip { rect } => {
                let clip_rect = Rect::from_min_size(
                    Pos2::new(tf.apply_x(rect.x), tf.apply_y(rect.y)),
                    egui::vec2(tf.scale_w(rect.w), tf.scale_h(rect.h)),
                );
                clip_stack.push(painter.clip_rect());
                let intersected = painter.clip_rect().intersect(clip_rect);
                painter.set_clip_rect(intersected);
            }

            RenderCommand::ClearClip => {
                if let Some(prev) = clip_stack.pop() {
                    painter.set_clip_rect(prev);
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups only matter to the SVG backend.
            }
        }
    }

    RenderResult { hit_regions }
}
