//! Per-field parsing for raw dataset cells.
//!
//! Every parser returns `None` for input it cannot make sense of; the caller
//! decides which sentinel to store and records the failure.

use std::collections::BTreeSet;

use bubblescope_protocol::SharedStr;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b, %Y",
    "%d %B, %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a currency-like price: `"9.99"`, `"$9.99"`, `"1,299.00"`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = strip_number_decorations(raw);
    let cleaned = cleaned.strip_prefix('$').unwrap_or(&cleaned);
    parse_finite(cleaned).filter(|p| *p >= 0.0)
}

/// Parse a positive-review percentage in `[0, 100]`.
pub fn parse_positive_rate(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_end_matches('%');
    parse_finite(cleaned).filter(|p| (0.0..=100.0).contains(p))
}

/// Parse a review count. Accepts thousands separators and a float with no
/// fractional part (`"1200.0"`), which spreadsheet exports produce.
pub fn parse_review_count(raw: &str) -> Option<u64> {
    let cleaned = strip_number_decorations(raw);
    if let Ok(n) = cleaned.parse::<u64>() {
        return Some(n);
    }
    let value = parse_finite(&cleaned)?;
    (value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then_some(value as u64)
}

/// Parse a bracketed genre list such as `"['Indie', 'Action']"` or
/// `"[Indie, Action]"`. Absent or empty input is an empty set.
pub fn parse_genres(raw: &str) -> BTreeSet<SharedStr> {
    raw.split(',')
        .map(|piece| piece.trim_matches(|c: char| matches!(c, '[' | ']' | '\'' | '"') || c.is_whitespace()))
        .filter(|tag| !tag.is_empty())
        .map(SharedStr::from)
        .collect()
}

/// Extract the release year from a date string.
pub fn parse_release_year(raw: &str) -> Option<i32> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok();
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date.year());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.year());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.year());
    }

    // "Nov 2020" / "November 2020": month precision only.
    let padded = format!("1 {text}");
    ["%d %b %Y", "%d %B %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&padded, fmt).ok())
        .map(|date| date.year())
}

fn strip_number_decorations(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != ',').collect()
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices() {
        assert_eq!(parse_price("19.99"), Some(19.99));
        assert_eq!(parse_price(" $4.99 "), Some(4.99));
        assert_eq!(parse_price("1,299.00"), Some(1299.0));
        assert_eq!(parse_price("0"), Some(0.0));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("free"), None);
        assert_eq!(parse_price("-3"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn positive_rates() {
        assert_eq!(parse_positive_rate("87"), Some(87.0));
        assert_eq!(parse_positive_rate("87.5%"), Some(87.5));
        assert_eq!(parse_positive_rate("101"), None);
        assert_eq!(parse_positive_rate("n/a"), None);
    }

    #[test]
    fn review_counts() {
        assert_eq!(parse_review_count("1200"), Some(1200));
        assert_eq!(parse_review_count("1,279,700"), Some(1_279_700));
        assert_eq!(parse_review_count("1200.0"), Some(1200));
        assert_eq!(parse_review_count("12.5"), None);
        assert_eq!(parse_review_count("-1"), None);
        assert_eq!(parse_review_count(""), None);
    }

    #[test]
    fn genre_lists() {
        let tags: Vec<String> = parse_genres("['Indie', 'Action', 'RPG']")
            .into_iter()
            .map(|g| g.to_string())
            .collect();
        assert_eq!(tags, ["Action", "Indie", "RPG"]);

        let tags = parse_genres("[Indie,  Action ]");
        assert!(tags.contains("Indie") && tags.contains("Action"));

        assert!(parse_genres("").is_empty());
        assert!(parse_genres("[]").is_empty());
    }

    #[test]
    fn release_years() {
        assert_eq!(parse_release_year("2019-05-14"), Some(2019));
        assert_eq!(parse_release_year("2019/05/14"), Some(2019));
        assert_eq!(parse_release_year("Nov 5, 2020"), Some(2020));
        assert_eq!(parse_release_year("November 15, 2014"), Some(2014));
        assert_eq!(parse_release_year("5 Nov, 2020"), Some(2020));
        assert_eq!(parse_release_year("Nov 2020"), Some(2020));
        assert_eq!(parse_release_year("2021-03-01T12:00:00Z"), Some(2021));
        assert_eq!(parse_release_year("2012"), Some(2012));
        assert_eq!(parse_release_year("Coming soon"), None);
        assert_eq!(parse_release_year(""), None);
    }
}
