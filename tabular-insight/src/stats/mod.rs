//! Statistics kernel shared by every query.
//!
//! - [`compute_stats`]: count, min, max, mean, median, population standard
//!   deviation, quartiles and interquartile range
//! - [`compute_histogram`]: equal-width bins over `[min, max]`
//! - [`FrequencyCounter`] and [`top_n`]: deterministic rankings where ties
//!   keep first-occurrence order

mod descriptive;
mod frequency;
mod histogram;

pub use descriptive::{compute_stats, quantile, DescriptiveStats, StatisticsRecord};
pub use frequency::{top_n, FrequencyCounter, KeyCount, TopValues};
pub use histogram::{compute_histogram, HistogramBin, DEFAULT_HISTOGRAM_BINS};
