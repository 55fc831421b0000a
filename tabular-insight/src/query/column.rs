use serde::Serialize;
use tracing::{debug, instrument};

use super::QueryContext;
use crate::dataset::ScanPurpose;
use crate::error::Result;
use crate::parse::{is_missing, parse_number};
use crate::scanner::decode_lenient;
use crate::stats::{compute_histogram, FrequencyCounter, HistogramBin, TopValues};

/// Equal-width histogram over the parseable raw values of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHistogram {
    pub name: String,
    /// Non-missing raw values considered.
    pub value_count: usize,
    /// Values that parsed as numbers and were binned.
    pub parsed_count: usize,
    pub bins: Vec<HistogramBin>,
}

impl ColumnHistogram {
    pub fn labels(&self) -> Vec<String> {
        self.bins.iter().map(HistogramBin::label).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|bin| bin.count).collect()
    }
}

impl QueryContext {
    /// Non-missing raw values of `name` in row order, at most `limit` of them.
    ///
    /// Values are returned as stored, untrimmed. An unknown column yields an
    /// empty list.
    #[instrument(skip(self), fields(mode = %self.handle().mode))]
    pub fn get_column_values(&self, name: &str, limit: usize) -> Result<Vec<String>> {
        let mut scanner = self.open_scan(ScanPurpose::ColumnValues)?;
        let Some(index) = scanner.column_index(name) else {
            debug!("Unknown column");
            return Ok(Vec::new());
        };

        let mut values = Vec::new();
        while values.len() < limit {
            let Some(row) = scanner.next_row()? else {
                break;
            };
            let cell = row.get(index);
            if !is_missing(Some(cell.as_str())) {
                values.push(cell);
            }
        }
        Ok(values)
    }

    /// Most frequent trimmed, non-missing values of `name`.
    ///
    /// Ties keep the order in which values first appeared.
    #[instrument(skip(self), fields(mode = %self.handle().mode))]
    pub fn get_top_values(&self, name: &str, limit: usize) -> Result<TopValues> {
        let mut scanner = self.open_scan(ScanPurpose::TopValues)?;
        let Some(index) = scanner.column_index(name) else {
            debug!("Unknown column");
            return Ok(TopValues::default());
        };

        let mut counter = FrequencyCounter::new();
        while let Some(row) = scanner.next_row()? {
            let Some(bytes) = row.bytes(index) else {
                continue;
            };
            let cell = decode_lenient(bytes);
            if is_missing(Some(cell.as_str())) {
                continue;
            }
            let trimmed = cell.trim();
            if !trimmed.is_empty() {
                counter.add(trimmed);
            }
        }

        debug!(distinct = counter.len(), rows = scanner.rows_read(), "Counted values");
        Ok(TopValues::from_counter(&counter, limit))
    }

    /// Histogram over the values [`QueryContext::get_column_values`] returns
    /// for the same `name` and `limit`.
    ///
    /// # Errors
    ///
    /// Besides scan failures, `bins == 0` is rejected as invalid input.
    #[instrument(skip(self), fields(mode = %self.handle().mode))]
    pub fn get_column_histogram(
        &self,
        name: &str,
        limit: usize,
        bins: usize,
    ) -> Result<ColumnHistogram> {
        let raw = self.get_column_values(name, limit)?;
        let parsed: Vec<f64> = raw.iter().filter_map(|value| parse_number(value)).collect();
        let bins = compute_histogram(&parsed, bins)?;

        Ok(ColumnHistogram {
            name: name.to_string(),
            value_count: raw.len(),
            parsed_count: parsed.len(),
            bins,
        })
    }
}
