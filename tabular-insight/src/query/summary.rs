use serde::Serialize;
use tracing::{info, instrument};

use super::{distinct_columns, OrderedColumnMap, QueryContext};
use crate::dataset::{DatasetMode, ScanPurpose};
use crate::error::Result;
use crate::parse::{ColumnKind, ColumnTally, SUMMARY_PARSING_NOTE};
use crate::stats::{compute_stats, StatisticsRecord};

/// Statistics of a numeric column, flattened next to its parse ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericColumnStats {
    #[serde(flatten)]
    pub stats: StatisticsRecord,
    pub parse_ratio: f64,
}

/// Whole-dataset overview: per-column missing counts, classification and
/// numeric statistics over the summary window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub dataset_name: String,
    pub mode: DatasetMode,
    pub mode_text: String,
    /// Rows inside the summary window.
    pub row_count: usize,
    pub columns: Vec<String>,
    /// Missing counts, only for columns with at least one missing cell.
    pub missing: OrderedColumnMap<usize>,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub numeric_stats: OrderedColumnMap<NumericColumnStats>,
    pub default_trim_cap: Option<usize>,
    pub numeric_threshold: f64,
    pub parsing_note: String,
}

impl DatasetSummary {
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        if self.numeric_columns.iter().any(|c| c == column) {
            Some(ColumnKind::Numeric)
        } else if self.categorical_columns.iter().any(|c| c == column) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }
}

impl QueryContext {
    /// Scans the summary window once and classifies every column.
    ///
    /// A header that repeats a name is summarized once under that name,
    /// using the last column carrying it.
    #[instrument(skip(self), fields(mode = %self.handle().mode))]
    pub fn compute_summary(&self) -> Result<DatasetSummary> {
        let mut scanner = self.open_scan(ScanPurpose::Summary)?;
        let columns = scanner.columns().to_vec();
        let distinct = distinct_columns(&columns);
        let mut tallies: Vec<ColumnTally> = vec![ColumnTally::new(); distinct.len()];

        while let Some(row) = scanner.next_row()? {
            for ((_, index), tally) in distinct.iter().zip(tallies.iter_mut()) {
                let cell = row.get(*index);
                tally.observe(Some(cell.as_str()));
            }
        }
        let row_count = scanner.rows_read();

        let classification = &self.config().classification;
        let mut missing = OrderedColumnMap::new();
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        let mut numeric_stats = OrderedColumnMap::new();

        for ((name, _), tally) in distinct.into_iter().zip(tallies) {
            if tally.missing > 0 {
                missing.push(name.clone(), tally.missing);
            }
            match tally.kind(classification) {
                ColumnKind::Numeric => {
                    let parse_ratio = tally.parse_ratio();
                    if tally.parsed > 0 {
                        numeric_stats.push(
                            name.clone(),
                            NumericColumnStats {
                                stats: compute_stats(tally.values()),
                                parse_ratio,
                            },
                        );
                    }
                    numeric_columns.push(name);
                }
                ColumnKind::Categorical => categorical_columns.push(name),
            }
        }

        info!(
            rows = row_count,
            columns = columns.len(),
            numeric = numeric_columns.len(),
            capped = scanner.cap_reached(),
            "Computed dataset summary"
        );

        let mode = self.handle().mode;
        Ok(DatasetSummary {
            dataset_name: self.handle().dataset_name(),
            mode,
            mode_text: self.mode_text(),
            row_count,
            columns,
            missing,
            numeric_columns,
            categorical_columns,
            numeric_stats,
            default_trim_cap: self.config().caps.trim_cap(mode),
            numeric_threshold: classification.numeric_threshold,
            parsing_note: SUMMARY_PARSING_NOTE.to_string(),
        })
    }
}
