use serde::{Deserialize, Serialize};

/// Closed interval of (possibly fractional) years.
///
/// Brushing produces fractional endpoints; a record's integer release year
/// is inside when `start <= year <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: f64,
    pub end: f64,
}

impl YearRange {
    /// Build a range, ordering the endpoints.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn from_years(start: i32, end: i32) -> Self {
        Self::new(f64::from(start), f64::from(end))
    }

    pub fn contains_year(&self, year: i32) -> bool {
        let y = f64::from(year);
        self.start <= y && y <= self.end
    }

    /// Whether `other` lies inside this range, allowing `tolerance` slack at
    /// both ends for values that went through a float round trip.
    pub fn covers(&self, other: &YearRange, tolerance: f64) -> bool {
        other.start >= self.start - tolerance && other.end <= self.end + tolerance
    }

    /// Clamp both endpoints into `bounds`.
    pub fn clamp_to(&self, bounds: &YearRange) -> Self {
        Self {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}–{:.0}", self.start, self.end)
    }
}
