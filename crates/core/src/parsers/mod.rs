pub mod fields;
pub mod steam_csv;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LoadError;
use crate::model::Dataset;

pub use steam_csv::{RawRow, normalize, normalize_with_report};

/// The record field a raw cell feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordField {
    Name,
    Genres,
    Price,
    PositiveRate,
    ReviewCount,
    ReleaseDate,
}

/// A cell that could not be parsed; the record keeps a sentinel in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparseableField {
    pub row: usize,
    pub field: RecordField,
    pub value: String,
}

/// What happened while loading a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: usize,
    /// Rows the CSV reader could not decode at all.
    pub rows_skipped: usize,
    pub unparseable: BTreeMap<RecordField, usize>,
}

impl LoadReport {
    pub(crate) fn record(&mut self, issue: UnparseableField) {
        *self.unparseable.entry(issue.field).or_default() += 1;
    }

    pub fn count(&self, field: RecordField) -> usize {
        self.unparseable.get(&field).copied().unwrap_or(0)
    }

    pub fn total_unparseable(&self) -> usize {
        self.unparseable.values().sum()
    }
}

/// Parse a Steam games CSV export into a dataset.
pub fn load_dataset(data: &[u8]) -> Result<(Dataset, LoadReport), LoadError> {
    let mut report = LoadReport::default();
    let rows = steam_csv::read_rows(data, &mut report)?;
    let records = normalize_with_report(&rows, &mut report);
    let dataset = Dataset::new(records);
    info!(
        records = dataset.len(),
        skipped = report.rows_skipped,
        unparseable = report.total_unparseable(),
        year_extent = ?dataset.year_extent(),
        "dataset loaded"
    );
    Ok((dataset, report))
}

pub fn load_path(path: &Path) -> Result<(Dataset, LoadReport), LoadError> {
    let data = std::fs::read(path)?;
    load_dataset(&data)
}
