//! Engine configuration.
//!
//! [`EngineConfig`] gathers every tunable of the engine: where the bundled
//! dataset and uploads live, the row caps applied per dataset mode, the
//! numeric-classification thresholds and the default limits used by query
//! front ends.
//!
//! # Example
//!
//! ```rust
//! use tabular_insight::config::EngineConfig;
//!
//! let config = EngineConfig::builder()
//!     .default_dataset("data/sample.csv")
//!     .upload_dir("/tmp/uploads")
//!     .numeric_threshold(0.8)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.caps.default_cap, 2000);
//! ```

use std::path::PathBuf;

use crate::dataset::RowCapPolicy;
use crate::error::{InsightError, Result};

/// File name of the dataset bundled with the application.
pub const DEFAULT_DATASET_FILENAME: &str =
    "marketing_sample_for_ebay_com-ebay_com_product_details.csv";

/// Environment variable overriding [`EngineConfig::default_dataset`].
pub const ENV_DEFAULT_DATASET: &str = "TABULAR_INSIGHT_DEFAULT_DATASET";
/// Environment variable overriding [`EngineConfig::upload_dir`].
pub const ENV_UPLOAD_DIR: &str = "TABULAR_INSIGHT_UPLOAD_DIR";
/// Environment variable overriding [`RowCapPolicy::default_cap`].
pub const ENV_DEFAULT_CAP: &str = "TABULAR_INSIGHT_DEFAULT_CAP";
/// Environment variable overriding [`RowCapPolicy::summary_cap`].
pub const ENV_SUMMARY_CAP: &str = "TABULAR_INSIGHT_SUMMARY_CAP";

/// Thresholds deciding whether a column is numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationConfig {
    /// Minimum fraction of non-missing values that must parse (default: 0.70)
    pub numeric_threshold: f64,
    /// Minimum number of values that must parse (default: 5)
    pub min_numeric_values: usize,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            numeric_threshold: 0.70,
            min_numeric_values: 5,
        }
    }
}

/// Configuration for the analytics engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Path of the bundled dataset used in default mode
    pub default_dataset: PathBuf,
    /// Directory receiving uploaded files
    pub upload_dir: PathBuf,
    /// Row caps per dataset mode and query
    pub caps: RowCapPolicy,
    /// Numeric classification thresholds
    pub classification: ClassificationConfig,
    /// Row bound for single-column statistics over uploaded data (default: 20000)
    pub column_stats_max_rows: usize,
    /// Default page size for previews (default: 50)
    pub preview_limit: usize,
    /// Default number of raw values returned for one column (default: 5000)
    pub column_values_limit: usize,
    /// Default length of top-value rankings (default: 10)
    pub top_values_limit: usize,
    /// Default histogram bin count (default: 10)
    pub histogram_bins: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_dataset: PathBuf::from(DEFAULT_DATASET_FILENAME),
            upload_dir: PathBuf::from("uploads"),
            caps: RowCapPolicy::default(),
            classification: ClassificationConfig::default(),
            column_stats_max_rows: 20_000,
            preview_limit: 50,
            column_values_limit: 5_000,
            top_values_limit: 10,
            histogram_bins: 10,
        }
    }
}

impl EngineConfig {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Loads the defaults and overlays any `TABULAR_INSIGHT_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DEFAULT_DATASET).filter(|v| !v.trim().is_empty()) {
            config.default_dataset = PathBuf::from(path.trim());
        }
        if let Some(dir) = lookup(ENV_UPLOAD_DIR).filter(|v| !v.trim().is_empty()) {
            config.upload_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup(ENV_DEFAULT_CAP) {
            config.caps.default_cap = parse_count(ENV_DEFAULT_CAP, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SUMMARY_CAP) {
            config.caps.summary_cap = parse_count(ENV_SUMMARY_CAP, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that thresholds and limits are usable.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.classification.numeric_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(InsightError::configuration(format!(
                "numeric_threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.caps.default_cap == 0 || self.caps.summary_cap == 0 {
            return Err(InsightError::configuration("row caps must be positive"));
        }
        if self.histogram_bins == 0 {
            return Err(InsightError::configuration("histogram_bins must be positive"));
        }
        if self.default_dataset.as_os_str().is_empty() {
            return Err(InsightError::configuration("default_dataset must not be empty"));
        }
        Ok(())
    }
}

fn parse_count(key: &str, raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|_| {
        InsightError::configuration(format!("{key} must be a non-negative integer, got '{raw}'"))
    })
}

/// Builder for [`EngineConfig`].
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the bundled dataset path
    pub fn default_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.default_dataset = path.into();
        self
    }

    /// Set the upload directory
    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    /// Set the row cap applied to every read of the default dataset
    pub fn default_cap(mut self, cap: usize) -> Self {
        self.config.caps.default_cap = cap;
        self
    }

    /// Set the row cap applied to summaries of uploaded data
    pub fn summary_cap(mut self, cap: usize) -> Self {
        self.config.caps.summary_cap = cap;
        self
    }

    /// Set the numeric parse-ratio threshold
    pub fn numeric_threshold(mut self, threshold: f64) -> Self {
        self.config.classification.numeric_threshold = threshold;
        self
    }

    /// Set the minimum count of parsed values for a numeric column
    pub fn min_numeric_values(mut self, count: usize) -> Self {
        self.config.classification.min_numeric_values = count;
        self
    }

    /// Set the default row bound for column statistics
    pub fn column_stats_max_rows(mut self, rows: usize) -> Self {
        self.config.column_stats_max_rows = rows;
        self
    }

    /// Set the default histogram bin count
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.config.histogram_bins = bins;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
