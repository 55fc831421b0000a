//! # tabular-insight - Streaming CSV analytics
//!
//! tabular-insight answers exploratory questions about a delimited text file:
//! what the columns are, which of them are numeric, how values are
//! distributed and what the most frequent categories are. It works on one
//! active dataset at a time, either a bundled default file or the most recent
//! upload, and reads it in a single bounded pass per query. Nothing is cached
//! between queries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabular_insight::prelude::*;
//!
//! # fn main() -> tabular_insight::error::Result<()> {
//! let config = EngineConfig::builder()
//!     .default_dataset("data/products.csv")
//!     .upload_dir("/var/lib/insight/uploads")
//!     .build()?;
//! let engine = DatasetEngine::new(config)?;
//!
//! // Default mode: every query reads at most the first 2000 rows.
//! let summary = engine.compute_summary()?;
//! for column in &summary.numeric_columns {
//!     let stats = &summary.numeric_stats.get(column).unwrap().stats;
//!     println!("{column}: median {:?}", stats.median());
//! }
//!
//! // After an upload, browsing queries see the whole file.
//! let csv = std::fs::read("listings.csv")?;
//! engine.store_upload(&csv, "listings.csv")?;
//! let page = engine.read_preview(0, 50)?;
//! println!("{} columns, {} rows shown", page.columns.len(), page.rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Cell parsing
//!
//! Cells are classified as missing (`""`, `NA`, `n/a`, `null`, `-`, an em
//! dash and a few more, case-insensitively), as a number after stripping
//! separators and decoration (`"$1,234.50"` is `1234.5`), or as unparsable.
//! A column is numeric when at least 70% of its present cells parse and at
//! least five of them do. See [`parse`].
//!
//! ## Row caps
//!
//! | Query | Default mode | Upload mode |
//! |-------|--------------|-------------|
//! | preview, column values, top values | 2000 | whole file |
//! | summary | 2000 | 2000 |
//! | column stats | 2000 | `max_rows` (20000) |
//!
//! ## Architecture
//!
//! - **`parse`**: cell classification and per-column tallies
//! - **`stats`**: descriptive statistics, histograms and frequency rankings
//! - **`dataset`**: the active dataset handle, uploads and row-cap policy
//! - **`scanner`**: lenient, cap-aware streaming reads
//! - **`query`**: preview, summary, column values, top values, column
//!   statistics and row filters
//! - **`engine`**: the thread-safe facade over all of the above
//! - **`items`**: aggregates over normalized marketplace item records
//! - **`logging`**: subscriber setup helpers

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod items;
pub mod logging;
pub mod parse;
pub mod prelude;
pub mod query;
pub mod scanner;
pub mod stats;
