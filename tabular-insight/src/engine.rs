//! The engine facade tying configuration, dataset state and queries together.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::dataset::{DatasetHandle, DatasetStore, UploadReceipt};
use crate::error::Result;
use crate::query::{
    ColumnHistogram, ColumnStatsReport, DatasetSummary, Preview, QueryContext,
};
use crate::stats::TopValues;

/// Shared entry point for front ends.
///
/// The engine is `Send + Sync`; share it behind an `Arc` and call it from any
/// number of threads. Each query snapshots the active dataset when it starts,
/// so an upload landing mid-query only affects queries issued after it.
///
/// # Examples
///
/// ```rust,no_run
/// use tabular_insight::prelude::*;
///
/// # fn main() -> tabular_insight::error::Result<()> {
/// let engine = DatasetEngine::new(EngineConfig::default())?;
///
/// let summary = engine.compute_summary()?;
/// println!("{} rows, numeric: {:?}", summary.row_count, summary.numeric_columns);
///
/// let top = engine.get_top_values("Condition", 5)?;
/// for (label, count) in top.labels.iter().zip(&top.counts) {
///     println!("{label}: {count}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DatasetEngine {
    config: Arc<EngineConfig>,
    store: DatasetStore,
}

impl DatasetEngine {
    /// Validates `config` and starts in default mode.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let store = DatasetStore::new(config.default_dataset.clone(), config.upload_dir.clone());
        info!(
            default_dataset = %config.default_dataset.display(),
            upload_dir = %config.upload_dir.display(),
            "Initialized dataset engine"
        );
        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The handle queries would read right now.
    pub fn active_dataset(&self) -> DatasetHandle {
        self.store.snapshot()
    }

    /// Snapshot for a single request.
    pub fn context(&self) -> QueryContext {
        QueryContext::new(self.store.snapshot(), Arc::clone(&self.config))
    }

    /// Mode description of the active dataset.
    pub fn mode_text(&self) -> String {
        self.context().mode_text()
    }

    /// Stores `bytes` as a new upload and makes it the active dataset.
    pub fn store_upload(&self, bytes: &[u8], original_filename: &str) -> Result<UploadReceipt> {
        self.store.store_upload(bytes, original_filename)
    }

    /// Switches back to the bundled dataset.
    pub fn reset(&self) -> DatasetHandle {
        self.store.reset()
    }

    /// Up to `limit` rows of the active dataset starting at `offset`.
    pub fn read_preview(&self, offset: usize, limit: usize) -> Result<Preview> {
        self.context().read_preview(offset, limit)
    }

    #[instrument(skip(self))]
    pub fn compute_summary(&self) -> Result<DatasetSummary> {
        self.context().compute_summary()
    }

    pub fn get_column_values(&self, name: &str, limit: usize) -> Result<Vec<String>> {
        self.context().get_column_values(name, limit)
    }

    pub fn get_top_values(&self, name: &str, limit: usize) -> Result<TopValues> {
        self.context().get_top_values(name, limit)
    }

    pub fn get_column_stats(&self, name: &str, max_rows: usize) -> Result<ColumnStatsReport> {
        self.context().get_column_stats(name, max_rows)
    }

    pub fn get_column_histogram(
        &self,
        name: &str,
        limit: usize,
        bins: usize,
    ) -> Result<ColumnHistogram> {
        self.context().get_column_histogram(name, limit, bins)
    }
}
