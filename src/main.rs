//! CLI entry point for the seasonal sales dashboard.
//!
//! Provides subcommands for inspecting the filterable universe of a sales CSV
//! and for running the full filter/aggregate/render pipeline once, emitting
//! the dashboard view as JSON.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sales_dashboard::loader::{DATE_FORMAT, load_cached};
use sales_dashboard::{filter::Selection, view::render};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sales_dashboard")]
#[command(about = "Filter and aggregate a seasonal sales dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the filterable universe of a sales CSV: distinct branches, hours,
    /// months and the observed date range
    Inspect {
        /// Path to the sales CSV
        #[arg(short, long, default_value = "ventas_estacionales_3.csv")]
        input: String,
    },
    /// Run the pipeline once and emit the dashboard view as JSON
    Report {
        /// Path to the sales CSV
        #[arg(short, long, default_value = "ventas_estacionales_3.csv")]
        input: String,

        /// Branch to include (repeatable; default: all observed)
        #[arg(short, long = "branch")]
        branches: Vec<String>,

        /// Hour of day to include (repeatable; default: all observed)
        #[arg(long = "hour")]
        hours: Vec<u8>,

        /// Month name to include (repeatable; default: all observed)
        #[arg(short, long = "month")]
        months: Vec<String>,

        /// Interval start, YYYY-MM-DD (default: earliest observed date)
        #[arg(long)]
        from: Option<String>,

        /// Interval end, YYYY-MM-DD (default: latest observed date, or
        /// `--from` when only `--from` is given)
        #[arg(long)]
        to: Option<String>,

        /// Write the JSON view here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sales_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input } => inspect(&input)?,
        Commands::Report {
            input,
            branches,
            hours,
            months,
            from,
            to,
            output,
        } => report(&input, branches, hours, months, from, to, output)?,
    }

    Ok(())
}

#[tracing::instrument]
fn inspect(input: &str) -> Result<()> {
    let table = load_cached(input).inspect_err(|e| error!(error = %e, "Load failed"))?;

    info!(
        rows = table.len(),
        has_units = table.has_units(),
        "Dataset schema"
    );
    info!(branches = ?table.branches(), "Observed branches");
    info!(hours = ?table.hours(), "Observed hours");
    info!(months = ?table.months(), "Observed months");

    match table.date_range() {
        Some((min, max)) => info!(from = %min, to = %max, "Observed date range"),
        None => info!("Dataset is empty"),
    }

    Ok(())
}

#[tracing::instrument(skip(branches, hours, months, from, to, output))]
fn report(
    input: &str,
    branches: Vec<String>,
    hours: Vec<u8>,
    months: Vec<String>,
    from: Option<String>,
    to: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let table = load_cached(input).inspect_err(|e| error!(error = %e, "Load failed"))?;

    // Unspecified filters default to "all observed", like the dashboard's
    // widgets on first render.
    let mut selection = Selection::all_of(table);
    if !branches.is_empty() {
        selection.branches = branches.into_iter().collect();
    }
    if !hours.is_empty() {
        selection.hours = hours.into_iter().collect();
    }
    if !months.is_empty() {
        selection.months = months.into_iter().collect();
    }

    let from = from.map(|s| parse_date(&s)).transpose()?;
    let to = to.map(|s| parse_date(&s)).transpose()?;
    selection = match (from, to) {
        (Some(start), end @ Some(_)) => selection.with_dates(start, end),
        // One bound collapses to a one-day interval.
        (Some(start), None) => selection.with_dates(start, None),
        (None, Some(end)) => selection.with_dates(end, None),
        (None, None) => selection,
    };

    let view = render(table, &selection);

    if view.metrics.is_empty() {
        info!("No rows match the selection; the view carries per-section warnings");
    }

    let json = serde_json::to_string_pretty(&view)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!(path, "Dashboard view written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}
