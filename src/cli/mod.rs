//! Command-line parsing.
//!
//! Argument parsing and command dispatch are kept apart from the analytics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{BPS_PER_PERCENT, MAX_DAY_OFFSET, Tenor};
use crate::io::DEFAULT_VALUE_COLUMN;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mr", version, about = "Macro event rate reactions and yield curve regimes (FRED-based)")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Measure 1-day reactions of a FRED series to macro events from a CSV.
    Events(EventArgs),
    /// Summarize a previously exported reactions CSV.
    Summarize(SummarizeArgs),
    /// Fetch the Treasury curve, classify its regime, and compare with an earlier date.
    Curve(CurveArgs),
    /// Classify and plot the built-in synthetic curve scenarios.
    Scenarios(ScenarioArgs),
}

#[derive(Debug, Args, Clone)]
pub struct EventArgs {
    /// Events CSV with columns event_id,event_type,event_date.
    #[arg(short, long, value_name = "CSV", default_value = "data/macro_events.csv")]
    pub events: PathBuf,

    /// FRED series id of the rate to study.
    #[arg(short, long, default_value = "DGS2")]
    pub series: String,

    /// First observation date (YYYY-MM-DD).
    #[arg(long, default_value = "2015-01-01")]
    pub start: NaiveDate,

    /// Last observation date (YYYY-MM-DD); defaults to latest available.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Multiplier applied to raw deltas (100 converts percent to bp).
    #[arg(long, default_value_t = BPS_PER_PERCENT)]
    pub scale: f64,

    /// Write per-event reactions to this CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Reaction column name in the exported CSV.
    #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
    pub value_column: String,

    /// Event category to summarize.
    #[arg(short, long, default_value = "CPI", conflicts_with = "all_categories")]
    pub category: String,

    /// Summarize every category present instead of one.
    #[arg(long)]
    pub all_categories: bool,

    /// Number of reaction rows to print.
    #[arg(long, default_value_t = 10)]
    pub preview: usize,

    /// Align events on the rayon thread pool.
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SummarizeArgs {
    /// Reactions CSV produced by `mr events --export`.
    #[arg(value_name = "CSV", default_value = "outputs/event_reaction_1d.csv")]
    pub path: PathBuf,

    /// Reaction column name.
    #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
    pub value_column: String,

    /// Event category to summarize.
    #[arg(short, long, default_value = "CPI", conflicts_with = "all_categories")]
    pub category: String,

    /// Summarize every category present instead of one.
    #[arg(long)]
    pub all_categories: bool,

    /// Unit label used in the output.
    #[arg(long, default_value = "bps")]
    pub unit: String,
}

#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Curve date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Days to look back for the last available observation of each tenor.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i64).range(0..=MAX_DAY_OFFSET))]
    pub lookback: i64,

    /// Tenors to fetch.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = Tenor::ALL.to_vec())]
    pub tenors: Vec<Tenor>,

    /// Short leg of the slope (years).
    #[arg(long, default_value_t = 2.0)]
    pub short: f64,

    /// Long leg of the slope (years).
    #[arg(long, default_value_t = 10.0)]
    pub long: f64,

    /// Compare with the curve this many days earlier.
    #[arg(long, default_value_t = 365, value_parser = clap::value_parser!(i64).range(0..=MAX_DAY_OFFSET))]
    pub compare_days: i64,

    /// Skip the comparison curve.
    #[arg(long)]
    pub no_compare: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,

    /// Export the latest curve and its classification to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ScenarioArgs {
    /// Short leg of the slope (years).
    #[arg(long, default_value_t = 2.0)]
    pub short: f64,

    /// Long leg of the slope (years).
    #[arg(long, default_value_t = 10.0)]
    pub long: f64,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 14)]
    pub height: usize,
}
