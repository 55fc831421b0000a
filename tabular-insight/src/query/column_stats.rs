use serde::Serialize;
use tracing::{debug, instrument};

use super::QueryContext;
use crate::dataset::ScanPurpose;
use crate::error::Result;
use crate::parse::{ColumnTally, COLUMN_STATS_PARSING_NOTE};
use crate::stats::{compute_stats, StatisticsRecord};

/// Numeric-parsing report for a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatsReport {
    pub name: String,
    pub rows_scanned: usize,
    pub missing_count: usize,
    pub unparsable_count: usize,
    pub parsed_count: usize,
    /// `parsed / non-missing`, `0.0` when nothing was present.
    pub parse_ratio: f64,
    pub stats: StatisticsRecord,
    pub parsing_note: String,
}

impl ColumnStatsReport {
    fn from_tally(name: &str, tally: ColumnTally) -> Self {
        let parse_ratio = tally.parse_ratio();
        Self {
            name: name.to_string(),
            rows_scanned: tally.rows,
            missing_count: tally.missing,
            unparsable_count: tally.unparsable,
            parsed_count: tally.parsed,
            parse_ratio,
            stats: compute_stats(tally.values()),
            parsing_note: COLUMN_STATS_PARSING_NOTE.to_string(),
        }
    }
}

impl QueryContext {
    /// Classifies every cell of `name` and summarizes the parsed values.
    ///
    /// For uploaded data the scan reads at most `max_rows` rows. An unknown
    /// column produces a report with zero rows scanned and no statistics.
    #[instrument(skip(self), fields(mode = %self.handle().mode))]
    pub fn get_column_stats(&self, name: &str, max_rows: usize) -> Result<ColumnStatsReport> {
        let mut scanner = self.open_scan(ScanPurpose::ColumnStats { max_rows })?;
        let mut tally = ColumnTally::new();

        let Some(index) = scanner.column_index(name) else {
            debug!("Unknown column");
            return Ok(ColumnStatsReport::from_tally(name, tally));
        };

        while let Some(row) = scanner.next_row()? {
            let cell = row.get(index);
            tally.observe(Some(cell.as_str()));
        }

        debug!(
            rows = tally.rows,
            parsed = tally.parsed,
            capped = scanner.cap_reached(),
            "Column scan complete"
        );
        Ok(ColumnStatsReport::from_tally(name, tally))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::EngineConfig;
    use crate::dataset::DatasetHandle;

    #[test]
    fn test_mixed_column_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "v\n\"$1,234.50\"\n12.5%\nN/A\n\u{2014}\n99\nabc\n").unwrap();
        let ctx = QueryContext::new(DatasetHandle::uploaded(path), Arc::new(EngineConfig::default()));

        let report = ctx.get_column_stats("v", 20_000).unwrap();
        assert_eq!(report.rows_scanned, 6);
        assert_eq!(report.missing_count, 2);
        assert_eq!(report.unparsable_count, 1);
        assert_eq!(report.parsed_count, 3);
        assert_eq!(report.parse_ratio, 0.75);
        assert_eq!(report.stats.median(), Some(99.0));

        let capped = ctx.get_column_stats("v", 2).unwrap();
        assert_eq!(capped.rows_scanned, 2);
        assert_eq!(capped.parsed_count, 2);
    }

    #[test]
    fn test_unknown_column_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "v\n1\n2\n").unwrap();
        let ctx = QueryContext::new(DatasetHandle::uploaded(path), Arc::new(EngineConfig::default()));

        let report = ctx.get_column_stats("nope", 100).unwrap();
        assert_eq!(report.rows_scanned, 0);
        assert_eq!(report.parsed_count, 0);
        assert_eq!(report.parse_ratio, 0.0);
        assert!(report.stats.is_empty());
    }
}
