//! Read-only queries over the active dataset.
//!
//! Every query runs against a [`QueryContext`]: an immutable snapshot of the
//! active [`DatasetHandle`] together with the engine configuration. Each call
//! opens its own scan, capped according to the dataset mode and the query
//! issuing it, so two queries never share a cursor and never observe a
//! dataset switch halfway through.
//!
//! | Query | Upload-mode cap |
//! |-------|-----------------|
//! | [`QueryContext::read_preview`] | none |
//! | [`QueryContext::get_column_values`] | none |
//! | [`QueryContext::get_top_values`] | none |
//! | [`QueryContext::compute_summary`] | `summary_cap` |
//! | [`QueryContext::get_column_stats`] | `max_rows` |
//!
//! In default mode every query is capped at `default_cap`.

mod column;
mod column_stats;
pub mod filter;
mod preview;
mod summary;

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::config::EngineConfig;
use crate::dataset::{DatasetHandle, ScanPurpose};
use crate::error::Result;
use crate::scanner::DatasetScanner;

pub use column::ColumnHistogram;
pub use column_stats::ColumnStatsReport;
pub use filter::RowFilter;
pub use preview::Preview;
pub use summary::{DatasetSummary, NumericColumnStats};

/// Per-request snapshot that queries run against.
#[derive(Debug, Clone)]
pub struct QueryContext {
    handle: DatasetHandle,
    config: Arc<EngineConfig>,
}

impl QueryContext {
    pub fn new(handle: DatasetHandle, config: Arc<EngineConfig>) -> Self {
        Self { handle, config }
    }

    pub fn handle(&self) -> &DatasetHandle {
        &self.handle
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The mode description reported with results from this context.
    pub fn mode_text(&self) -> String {
        self.config.caps.mode_text(self.handle.mode)
    }

    /// Opens a scan with the cap that applies to `purpose`.
    fn open_scan(&self, purpose: ScanPurpose) -> Result<DatasetScanner> {
        let cap = self.config.caps.effective_cap(self.handle.mode, purpose);
        debug!(?purpose, ?cap, "Starting scan");
        DatasetScanner::open(&self.handle, cap)
    }
}

/// Column-keyed values that serialize as a map in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedColumnMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> OrderedColumnMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry; callers insert each column at most once.
    pub fn push(&mut self, column: impl Into<String>, value: T) {
        self.entries.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for OrderedColumnMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for OrderedColumnMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Column names with repeats removed, each paired with the index of its
/// last occurrence.
pub(crate) fn distinct_columns(columns: &[String]) -> Vec<(String, usize)> {
    let mut distinct: Vec<(String, usize)> = Vec::new();
    for (index, name) in columns.iter().enumerate() {
        match distinct.iter_mut().find(|(seen, _)| seen == name) {
            Some(entry) => entry.1 = index,
            None => distinct.push((name.clone(), index)),
        }
    }
    distinct
}
