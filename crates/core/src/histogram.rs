use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::FilteredRecord;
use crate::model::{Category, YearRange};

/// Number of games released in one year, split by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBin {
    pub year: i32,
    pub indie: usize,
    pub studio: usize,
}

impl YearBin {
    pub fn total(&self) -> usize {
        self.indie + self.studio
    }
}

/// Releases per year for the timeline, sorted by year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearHistogram {
    pub bins: Vec<YearBin>,
}

impl YearHistogram {
    /// Count `records` per release year. Records without a year and years
    /// before `min_year` are left out.
    pub fn from_records(records: &[FilteredRecord<'_>], min_year: Option<i32>) -> Self {
        let mut by_year: BTreeMap<i32, YearBin> = BTreeMap::new();
        for r in records {
            let Some(year) = r.record.release_year else {
                continue;
            };
            if min_year.is_some_and(|min| year < min) {
                continue;
            }
            let bin = by_year.entry(year).or_insert(YearBin {
                year,
                indie: 0,
                studio: 0,
            });
            match r.category {
                Category::Indie => bin.indie += 1,
                Category::Studio => bin.studio += 1,
            }
        }
        Self {
            bins: by_year.into_values().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bin(&self, year: i32) -> Option<&YearBin> {
        self.bins
            .binary_search_by_key(&year, |b| b.year)
            .ok()
            .map(|i| &self.bins[i])
    }

    /// First to last year with at least one release.
    pub fn year_extent(&self) -> Option<YearRange> {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => Some(YearRange::from_years(first.year, last.year)),
            _ => None,
        }
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(YearBin::total).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::model::record::fixtures::record;

    fn tagged(records: &[Record]) -> Vec<FilteredRecord<'_>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| FilteredRecord {
                index,
                record,
                category: record.category(),
            })
            .collect()
    }

    #[test]
    fn counts_per_year_and_category() {
        let records = vec![
            record("A", &["Indie"], 1000, 2015),
            record("B", &["Action"], 2000, 2015),
            record("C", &["Indie"], 700, 2018),
            record("D", &["Indie"], 700, 1997),
        ];
        let hist = YearHistogram::from_records(&tagged(&records), Some(2006));
        assert_eq!(hist.bins.len(), 2);
        assert_eq!(
            hist.bin(2015),
            Some(&YearBin {
                year: 2015,
                indie: 1,
                studio: 1
            })
        );
        assert_eq!(hist.bin(1997), None);
        assert_eq!(hist.year_extent(), Some(YearRange::from_years(2015, 2018)));
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn missing_years_are_skipped() {
        let mut undated = record("U", &["Indie"], 1000, 0);
        undated.release_year = None;
        let records = vec![undated];
        let hist = YearHistogram::from_records(&tagged(&records), None);
        assert!(hist.is_empty());
        assert_eq!(hist.year_extent(), None);
        assert_eq!(hist.max_count(), 0);
    }
}
