use serde::{Deserialize, Serialize};

use super::DatasetMode;

/// Row caps applied to scans, per dataset mode and query.
///
/// In default mode every scan stops after `default_cap` rows. Uploaded data is
/// browsed in full (preview, column values, top values), while the aggregate
/// queries are bounded: summaries by `summary_cap` and column statistics by
/// the caller's `max_rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCapPolicy {
    pub default_cap: usize,
    pub summary_cap: usize,
}

impl Default for RowCapPolicy {
    fn default() -> Self {
        Self {
            default_cap: 2000,
            summary_cap: 2000,
        }
    }
}

/// The query a scan is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPurpose {
    Preview,
    ColumnValues,
    TopValues,
    Summary,
    ColumnStats { max_rows: usize },
}

impl RowCapPolicy {
    /// Maximum number of rows a scan may read, or `None` for the whole file.
    pub fn effective_cap(&self, mode: DatasetMode, purpose: ScanPurpose) -> Option<usize> {
        match mode {
            DatasetMode::Default => Some(self.default_cap),
            DatasetMode::Upload => match purpose {
                ScanPurpose::Preview | ScanPurpose::ColumnValues | ScanPurpose::TopValues => None,
                ScanPurpose::Summary => Some(self.summary_cap),
                ScanPurpose::ColumnStats { max_rows } => Some(max_rows),
            },
        }
    }

    /// Cap reported to consumers as the default-mode trim, `None` for uploads.
    pub fn trim_cap(&self, mode: DatasetMode) -> Option<usize> {
        match mode {
            DatasetMode::Default => Some(self.default_cap),
            DatasetMode::Upload => None,
        }
    }

    /// Human-readable description of the caps in effect for `mode`.
    ///
    /// Exports echo this text verbatim, so it depends on nothing but the mode
    /// and the policy.
    pub fn mode_text(&self, mode: DatasetMode) -> String {
        match mode {
            DatasetMode::Default => {
                format!("Default dataset (preview trimmed to {} rows)", self.default_cap)
            }
            DatasetMode::Upload => "User uploaded dataset (full file, NOT trimmed)".to_string(),
        }
    }
}
