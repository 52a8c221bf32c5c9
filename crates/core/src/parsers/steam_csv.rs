use serde::Deserialize;
use tracing::{debug, warn};

use super::fields;
use super::{LoadReport, RecordField, UnparseableField};
use crate::error::LoadError;
use crate::model::Record;

/// One row of the Steam games export, before any parsing.
///
/// Columns that are missing from the file deserialize as empty strings and
/// go through the same sentinel handling as malformed cells.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "price_initial (USD)")]
    pub price_initial_usd: String,
    #[serde(default)]
    pub positive_percentual: String,
    #[serde(default)]
    pub total_reviews: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub release_date: String,
}

/// Read raw rows from CSV bytes.
///
/// Rows the CSV reader cannot decode are skipped and counted; the rest of
/// the file still loads. Cells that are not valid UTF-8 are decoded lossily
/// and reported against their column, so the row survives.
pub fn read_rows(data: &[u8], report: &mut LoadReport) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = csv::StringRecord::from_byte_record_lossy(reader.byte_headers()?.clone());
    if headers.is_empty() {
        return Err(LoadError::MissingHeader);
    }
    let columns: Vec<Option<RecordField>> = headers.iter().map(column_field).collect();

    let mut rows = Vec::new();
    for (line, result) in reader.byte_records().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                warn!(row = line, error = %err, "skipping unreadable CSV row");
                report.rows_skipped += 1;
                continue;
            }
        };
        let record = csv::StringRecord::from_byte_record_lossy(raw.clone());
        match record.deserialize::<RawRow>(Some(&headers)) {
            Ok(row) => {
                for (cell, field) in raw.iter().zip(&columns) {
                    if let (Err(_), Some(field)) = (std::str::from_utf8(cell), field) {
                        let issue = UnparseableField {
                            row: rows.len(),
                            field: *field,
                            value: String::from_utf8_lossy(cell).into_owned(),
                        };
                        debug!(row = issue.row, field = ?issue.field, "cell is not UTF-8, decoded lossily");
                        report.record(issue);
                    }
                }
                rows.push(row);
            }
            Err(err) => {
                warn!(row = line, error = %err, "skipping unreadable CSV row");
                report.rows_skipped += 1;
            }
        }
    }
    Ok(rows)
}

/// Record field a CSV column feeds, if any.
fn column_field(header: &str) -> Option<RecordField> {
    match header {
        "name" => Some(RecordField::Name),
        "genres" => Some(RecordField::Genres),
        "price_initial (USD)" => Some(RecordField::Price),
        "positive_percentual" => Some(RecordField::PositiveRate),
        "total_reviews" => Some(RecordField::ReviewCount),
        "release_date" => Some(RecordField::ReleaseDate),
        _ => None,
    }
}

/// Turn raw rows into records.
pub fn normalize(rows: &[RawRow]) -> Vec<Record> {
    normalize_with_report(rows, &mut LoadReport::default())
}

/// Turn raw rows into records, tallying every field that fell back to its
/// sentinel.
pub fn normalize_with_report(rows: &[RawRow], report: &mut LoadReport) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            report.rows_read += 1;
            normalize_row(index, row, report)
        })
        .collect()
}

fn normalize_row(index: usize, row: &RawRow, report: &mut LoadReport) -> Record {
    let mut note = |field: RecordField, raw: &str| {
        let issue = UnparseableField {
            row: index,
            field,
            value: raw.to_string(),
        };
        debug!(row = issue.row, field = ?issue.field, value = %issue.value, "unparseable field");
        report.record(issue);
    };

    let price = fields::parse_price(&row.price_initial_usd).unwrap_or_else(|| {
        note(RecordField::Price, &row.price_initial_usd);
        f64::NAN
    });
    let positive_rate = fields::parse_positive_rate(&row.positive_percentual).unwrap_or_else(|| {
        note(RecordField::PositiveRate, &row.positive_percentual);
        f64::NAN
    });
    let review_count = fields::parse_review_count(&row.total_reviews);
    if review_count.is_none() {
        note(RecordField::ReviewCount, &row.total_reviews);
    }
    let release_year = fields::parse_release_year(&row.release_date);
    if release_year.is_none() {
        note(RecordField::ReleaseDate, &row.release_date);
    }

    Record {
        name: row.name.trim().into(),
        price,
        positive_rate,
        review_count,
        release_year,
        genres: fields::parse_genres(&row.genres),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"name,price_initial (USD),positive_percentual,total_reviews,genres,release_date
Hollow Knight,14.99,97,250000,\"['Indie', 'Action', 'Adventure']\",2017-02-24
Bad Row,n/a,??,lots,,someday
Portal 2,9.99,98,\"300,000\",\"['Action', 'Adventure']\",\"Apr 18, 2011\"
";

    #[test]
    fn parses_sample_rows() {
        let mut report = LoadReport::default();
        let rows = read_rows(SAMPLE, &mut report).unwrap();
        assert_eq!(rows.len(), 3);
        let records = normalize_with_report(&rows, &mut report);

        let hk = &records[0];
        assert_eq!(hk.name, "Hollow Knight");
        assert_eq!(hk.price, 14.99);
        assert_eq!(hk.review_count, Some(250_000));
        assert_eq!(hk.release_year, Some(2017));
        assert!(hk.is_indie());

        let portal = &records[2];
        assert_eq!(portal.review_count, Some(300_000));
        assert_eq!(portal.release_year, Some(2011));
        assert!(!portal.is_indie());
    }

    #[test]
    fn malformed_fields_keep_the_row() {
        let mut report = LoadReport::default();
        let rows = read_rows(SAMPLE, &mut report).unwrap();
        let records = normalize_with_report(&rows, &mut report);

        let bad = &records[1];
        assert_eq!(bad.name, "Bad Row");
        assert!(bad.price.is_nan());
        assert!(bad.positive_rate.is_nan());
        assert_eq!(bad.review_count, None);
        assert_eq!(bad.release_year, None);
        assert!(bad.genres.is_empty());

        assert_eq!(report.rows_read, 3);
        assert_eq!(report.count(RecordField::Price), 1);
        assert_eq!(report.count(RecordField::ReleaseDate), 1);
        assert_eq!(report.total_unparseable(), 4);
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let mut report = LoadReport::default();
        let rows = read_rows(b"name,genres\nSolo,[Indie]\n", &mut report).unwrap();
        let records = normalize_with_report(&rows, &mut report);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_indie());
        assert_eq!(records[0].review_count, None);
    }

    #[test]
    fn invalid_utf8_cell_keeps_the_row() {
        let data: &[u8] = b"name,price_initial (USD),positive_percentual,total_reviews,genres,release_date
Pok\xe9mon Puzzle,9.99,80,1000,\"['Indie', 'Puzzle']\",2019-03-01
Celeste,19.99,97,80000,\"['Indie', 'Action']\",2018-01-25
";
        let mut report = LoadReport::default();
        let rows = read_rows(data, &mut report).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(report.rows_skipped, 0);
        assert_eq!(report.count(RecordField::Name), 1);

        let records = normalize_with_report(&rows, &mut report);
        let first = &records[0];
        assert_eq!(first.name, "Pok\u{FFFD}mon Puzzle");
        assert_eq!(first.price, 9.99);
        assert_eq!(first.review_count, Some(1000));
        assert!(first.is_indie());
        assert!(first.genres.contains("Puzzle"));
        assert_eq!(report.total_unparseable(), 1);
    }

    #[test]
    fn empty_input_has_no_header() {
        let mut report = LoadReport::default();
        let result = read_rows(b"", &mut report);
        assert!(matches!(result, Err(LoadError::MissingHeader)));
    }
}
