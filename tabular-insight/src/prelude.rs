//! Prelude for commonly used types in tabular-insight.

pub use crate::config::{ClassificationConfig, EngineConfig};
pub use crate::dataset::{DatasetHandle, DatasetMode, RowCapPolicy, UploadReceipt};
pub use crate::engine::DatasetEngine;
pub use crate::error::{ErrorContext, InsightError, Result};
pub use crate::items::{compute_item_analytics, items_from_json, ItemAnalytics, ItemRecord};
pub use crate::parse::{classify, ColumnKind, ParsedValue};
pub use crate::query::{
    ColumnHistogram, ColumnStatsReport, DatasetSummary, Preview, QueryContext, RowFilter,
};
pub use crate::scanner::Row;
pub use crate::stats::{compute_histogram, compute_stats, HistogramBin, StatisticsRecord, TopValues};
