use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Bubbles colored by share of positive reviews, lowest to highest.
    SentimentNegative,
    SentimentMixed,
    SentimentPositive,
    SentimentOverwhelming,

    // Bubbles colored by category in compare mode.
    BubbleIndie,
    BubbleStudio,

    ChartBackground,
    AxisLine,
    GridLine,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Timeline
    TimelineFill,
    TimelineIndieLine,
    BrushFill,
    BrushBorder,

    Background,
    Border,
}

impl ThemeToken {
    /// Bucket a positive-review percentage into one of the sentiment tokens.
    pub fn for_positive_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            ThemeToken::SentimentOverwhelming
        } else if rate >= 70.0 {
            ThemeToken::SentimentPositive
        } else if rate >= 40.0 {
            ThemeToken::SentimentMixed
        } else {
            ThemeToken::SentimentNegative
        }
    }
}
