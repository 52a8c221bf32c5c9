use bubblescope_protocol::ThemeToken;

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            ThemeMode::Dark => egui::Visuals::dark(),
            ThemeMode::Light => egui::Visuals::light(),
        }
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    resolve_rgba(token, mode).to_color32()
}

/// Same as [`resolve`] with an extra opacity factor applied to alpha.
pub fn resolve_with_opacity(token: ThemeToken, mode: ThemeMode, opacity: f64) -> egui::Color32 {
    let mut c = resolve_rgba(token, mode);
    c.a = (f64::from(c.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    c.to_color32()
}

fn resolve_rgba(token: ThemeToken, mode: ThemeMode) -> ResolvedColor {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        SentimentNegative => ResolvedColor::rgb(0xf3, 0x8b, 0xa8), // Red
        SentimentMixed => ResolvedColor::rgb(0xf9, 0xe2, 0xaf),    // Yellow
        SentimentPositive => ResolvedColor::rgb(0xa6, 0xe3, 0xa1), // Green
        SentimentOverwhelming => ResolvedColor::rgb(0x94, 0xe2, 0xd5), // Teal

        BubbleIndie => ResolvedColor::rgb(0x89, 0xb4, 0xfa),  // Blue
        BubbleStudio => ResolvedColor::rgb(0xfa, 0xb3, 0x87), // Peach

        ChartBackground => ResolvedColor::rgb(0x1e, 0x1e, 0x2e), // Base
        AxisLine => ResolvedColor::rgb(0x6c, 0x70, 0x86),        // Overlay0
        GridLine => ResolvedColor::rgb(0x31, 0x32, 0x44),        // Surface0

        TextPrimary => ResolvedColor::rgb(0xcd, 0xd6, 0xf4), // Text
        TextSecondary => ResolvedColor::rgb(0xba, 0xc2, 0xde), // Subtext1
        TextMuted => ResolvedColor::rgb(0xa6, 0xad, 0xc8),   // Subtext0

        TimelineFill => ResolvedColor::rgba(0x94, 0xe2, 0xd5, 200), // Teal
        TimelineIndieLine => ResolvedColor::rgb(0x89, 0xb4, 0xfa),
        BrushFill => ResolvedColor::rgba(0xb4, 0xbe, 0xfe, 60), // Lavender
        BrushBorder => ResolvedColor::rgb(0xb4, 0xbe, 0xfe),

        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust
        Border => ResolvedColor::rgb(0x31, 0x32, 0x44),     // Surface0
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    // Viridis stops for the sentiment buckets.
    use ThemeToken::*;
    match token {
        SentimentNegative => ResolvedColor::rgb(0x44, 0x01, 0x54),
        SentimentMixed => ResolvedColor::rgb(0x31, 0x68, 0x8e),
        SentimentPositive => ResolvedColor::rgb(0x35, 0xb7, 0x79),
        SentimentOverwhelming => ResolvedColor::rgb(0xfd, 0xe7, 0x25),

        BubbleIndie => ResolvedColor::rgb(31, 119, 180),
        BubbleStudio => ResolvedColor::rgb(255, 127, 14),

        ChartBackground => ResolvedColor::rgb(255, 255, 255),
        AxisLine => ResolvedColor::rgb(51, 51, 51),
        GridLine => ResolvedColor::rgb(229, 229, 229),

        TextPrimary => ResolvedColor::rgb(20, 20, 30),
        TextSecondary => ResolvedColor::rgb(80, 80, 100),
        TextMuted => ResolvedColor::rgb(100, 100, 110),

        TimelineFill => ResolvedColor::rgba(105, 179, 162, 200),
        TimelineIndieLine => ResolvedColor::rgb(31, 119, 180),
        BrushFill => ResolvedColor::rgba(119, 119, 119, 70),
        BrushBorder => ResolvedColor::rgb(51, 51, 51),

        Background => ResolvedColor::rgb(248, 248, 250),
        Border => ResolvedColor::rgb(210, 210, 220),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_scales_alpha() {
        let c = resolve_with_opacity(ThemeToken::BubbleIndie, ThemeMode::Light, 0.5);
        assert_eq!(c.a(), 128);
        let clear = resolve_with_opacity(ThemeToken::BubbleIndie, ThemeMode::Light, -1.0);
        assert_eq!(clear.a(), 0);
    }

    #[test]
    fn modes_toggle() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert!(ThemeMode::Dark.visuals().dark_mode);
    }
}
