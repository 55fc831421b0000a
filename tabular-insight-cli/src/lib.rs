//! tabular-insight CLI - command-line front end for the analytics engine
//!
//! Every command prints one JSON document on stdout; logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tabular_insight::config::EngineConfig;
use tabular_insight::dataset::{DatasetHandle, UploadReceipt};
use tabular_insight::engine::DatasetEngine;
use tabular_insight::items::{compute_item_analytics, items_from_json};
use tabular_insight::logging::setup::{init_logging, LoggingConfig};
use tabular_insight::query::{DatasetSummary, QueryContext, RowFilter};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Analyze this file as an uploaded dataset instead of the bundled one
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Log engine internals at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify every column and summarize the numeric ones
    Summary,
    /// Show a page of raw rows
    Preview {
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
        /// Keep rows containing this text (case-insensitive)
        #[arg(long, conflicts_with_all = ["min", "max"])]
        contains: Option<String>,
        /// Restrict the filter to one column
        #[arg(long)]
        column: Option<String>,
        /// Keep rows whose column value is at least this number
        #[arg(long, requires = "column")]
        min: Option<f64>,
        /// Keep rows whose column value is at most this number
        #[arg(long, requires = "column")]
        max: Option<f64>,
    },
    /// List the non-missing raw values of a column
    Values {
        column: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Rank the most frequent values of a column
    Top {
        column: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Report numeric parsing and statistics for a column
    Stats {
        column: String,
        #[arg(long)]
        max_rows: Option<usize>,
    },
    /// Bin the numeric values of a column
    Histogram {
        column: String,
        #[arg(long)]
        bins: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Store a copy of a file as the active dataset and summarize it
    Upload { file: PathBuf },
    /// Aggregate a JSON array of normalized item records
    Items { file: PathBuf },
}

#[derive(Debug, Serialize)]
struct UploadOutput {
    receipt: UploadReceipt,
    summary: DatasetSummary,
}

#[derive(Debug, Serialize)]
struct FilteredPreview {
    filter: String,
    mode_text: String,
    columns: Vec<String>,
    rows: Vec<tabular_insight::scanner::Row>,
    matched: usize,
    offset: usize,
    limit: usize,
}

/// Installs the stderr subscriber.
pub fn init_tracing(json: bool, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let config = LoggingConfig::default()
        .with_level(Level::WARN)
        .with_crate_level(level)
        .with_json_format(json);
    init_logging(config).map_err(|e| anyhow::anyhow!("initializing logging: {e}"))
}

/// Pretty-prints `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn filter_from_args(
    contains: Option<String>,
    column: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
) -> Option<RowFilter> {
    match (contains, column) {
        (Some(text), column) => Some(RowFilter::contains(column.as_deref(), text)),
        (None, Some(column)) if min.is_some() || max.is_some() => {
            Some(RowFilter::range(column, min, max))
        }
        _ => None,
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Runs one command.
pub fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::from_env().context("loading configuration")?;
    let engine = DatasetEngine::new(config)?;

    let ctx = match &cli.dataset {
        Some(path) => QueryContext::new(
            DatasetHandle::uploaded(path.clone()),
            Arc::new(engine.config().clone()),
        ),
        None => engine.context(),
    };
    let defaults = engine.config();

    match cli.command {
        Command::Summary => print_json(&ctx.compute_summary()?),
        Command::Preview {
            offset,
            limit,
            contains,
            column,
            min,
            max,
        } => {
            let limit = limit.unwrap_or(defaults.preview_limit);
            let preview = ctx.read_preview(offset, limit)?;
            match filter_from_args(contains, column, min, max) {
                None => print_json(&preview),
                Some(filter) => {
                    let rows = filter.apply(&preview.rows);
                    print_json(&FilteredPreview {
                        filter: filter.describe(),
                        mode_text: ctx.mode_text(),
                        columns: preview.columns,
                        matched: rows.len(),
                        rows,
                        offset,
                        limit,
                    })
                }
            }
        }
        Command::Values { column, limit } => {
            let limit = limit.unwrap_or(defaults.column_values_limit);
            print_json(&ctx.get_column_values(&column, limit)?)
        }
        Command::Top { column, limit } => {
            let limit = limit.unwrap_or(defaults.top_values_limit);
            print_json(&ctx.get_top_values(&column, limit)?)
        }
        Command::Stats { column, max_rows } => {
            let max_rows = max_rows.unwrap_or(defaults.column_stats_max_rows);
            print_json(&ctx.get_column_stats(&column, max_rows)?)
        }
        Command::Histogram {
            column,
            bins,
            limit,
        } => {
            let bins = bins.unwrap_or(defaults.histogram_bins);
            let limit = limit.unwrap_or(defaults.column_values_limit);
            print_json(&ctx.get_column_histogram(&column, limit, bins)?)
        }
        Command::Upload { file } => {
            if cli.dataset.is_some() {
                bail!("--dataset cannot be combined with upload");
            }
            let bytes = read_file(&file)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let receipt = engine.store_upload(&bytes, &name)?;
            info!(stored = %receipt.stored_name, "Upload stored");
            let summary = engine.compute_summary()?;
            print_json(&UploadOutput { receipt, summary })
        }
        Command::Items { file } => {
            let bytes = read_file(&file)?;
            let json = String::from_utf8(bytes)
                .with_context(|| format!("{} is not valid UTF-8", file.display()))?;
            let items = items_from_json(&json)?;
            print_json(&compute_item_analytics(&items)?)
        }
    }
}
