//! Railstats CLI - Reports over the Dutch railway datasets
//!
//! Usage:
//!   railstats analyze [--mode local|remote]
//!   railstats report <name> [--limit N] [--month-cutoff M] [--top N --start M --end M] [--order asc|desc]
//!   railstats sql <name> [--mode local|remote]
//!   railstats list
//!
//! Examples:
//!   railstats --mode local analyze
//!   railstats report top-stations --top 3 --start 1 --end 12
//!   railstats --format json report station-pairs --order asc
//!   railstats --mode remote sql station-pairs

use clap::{Args, Parser, Subcommand, ValueEnum};
use railstats::compose::QueryComposer;
use railstats::config::{AnalyzeSettings, Settings};
use railstats::dataset::ResolvedSources;
use railstats::report::{
    self, BusiestByMonth, DatasetRowCounts, DistanceListing, Report, StationListing, StationPairs,
    TopStationsInPeriod,
};
use railstats::render::{render_json, render_table};
use railstats::tables::TableRegistry;
use railstats::config::SettingsError;
use railstats::{Analyzer, AnalyzerError, Mode, ResultTable, SortDir};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "railstats")]
#[command(about = "Railstats - Reports over the Dutch railway services, stations and distances")]
#[command(version)]
struct Cli {
    /// Read datasets from local files or remote URLs (overrides the config file)
    #[arg(long, global = true)]
    mode: Option<ModeArg>,

    /// Path to a railstats.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis sequence
    Analyze,

    /// Run a single report
    Report {
        /// Report name (see `railstats list`)
        name: String,

        #[command(flatten)]
        params: ReportParams,
    },

    /// Print the composed SQL for a report without running it
    Sql {
        /// Report name (see `railstats list`)
        name: String,

        #[command(flatten)]
        params: ReportParams,
    },

    /// List reports and logical tables
    List,
}

#[derive(Args, Default)]
struct ReportParams {
    /// Number of rows for listings and station pairs
    #[arg(long)]
    limit: Option<u32>,

    /// Last month for the busiest-by-month report
    #[arg(long)]
    month_cutoff: Option<u32>,

    /// Stations per month for the top-stations report
    #[arg(long)]
    top: Option<u32>,

    /// First month for the top-stations report
    #[arg(long)]
    start: Option<u32>,

    /// Last month for the top-stations report
    #[arg(long)]
    end: Option<u32>,

    /// Station pair order: desc for furthest, asc for shortest
    #[arg(long)]
    order: Option<OrderArg>,
}

/// Failures surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown report '{0}' (run `railstats list`)")]
    UnknownReport(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Local,
    Remote,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Local => Mode::Local,
            ModeArg::Remote => Mode::Remote,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortDir {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortDir::Asc,
            OrderArg::Desc => SortDir::Desc,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Bordered console table
    Table,
    /// Pretty-printed JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mode = cli.mode.map(Mode::from).unwrap_or(settings.mode);

    let result = match cli.command {
        Commands::Analyze => cmd_analyze(&settings, mode, cli.format),
        Commands::Report { name, params } => cmd_report(&settings, mode, &name, &params, cli.format),
        Commands::Sql { name, params } => cmd_sql(&settings, mode, &name, &params),
        Commands::List => cmd_list(&settings, mode),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("RAILSTATS_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, SettingsError> {
    let settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    Ok(settings)
}

fn cmd_analyze(settings: &Settings, mode: Mode, format: OutputFormat) -> Result<(), CliError> {
    let catalog = settings.catalog()?;
    let analyzer = Analyzer::open(mode, &catalog)?;
    let params = &settings.analyze;

    print_table(&analyzer.row_counts()?, format)?;
    print_table(&analyzer.stations(params.stations_limit)?, format)?;
    print_table(&analyzer.distances(params.distances_limit)?, format)?;
    print_table(&analyzer.busiest_by_month(params.month_cutoff)?, format)?;
    print_table(
        &analyzer.top_stations_in_period(params.top_n, params.top_start, params.top_end)?,
        format,
    )?;
    print_table(
        &analyzer.station_pairs(params.pairs_order, params.pairs_limit)?,
        format,
    )?;

    Ok(analyzer.close()?)
}

fn cmd_report(
    settings: &Settings,
    mode: Mode,
    name: &str,
    params: &ReportParams,
    format: OutputFormat,
) -> Result<(), CliError> {
    let catalog = settings.catalog()?;
    // Unknown names fail before any engine work.
    let report = build_report(name, params, &settings.analyze, &catalog.resolve_all(mode))?;

    let analyzer = Analyzer::open(mode, &catalog)?;
    print_table(&analyzer.run(report.as_ref())?, format)?;
    Ok(analyzer.close()?)
}

fn cmd_sql(settings: &Settings, mode: Mode, name: &str, params: &ReportParams) -> Result<(), CliError> {
    let sources = settings.catalog()?.resolve_all(mode);
    let report = build_report(name, params, &settings.analyze, &sources)?;
    let composer = QueryComposer::planned(mode, TableRegistry::standard(&sources)?);

    let sql = composer.compose(&report.body(), report.required_tables())?;
    println!("-- Railstats composed SQL");
    println!("-- Report: {}", report.name());
    println!("-- Mode: {} ({} materialization)", mode, composer.strategy_name());
    for (i, param) in report.params().iter().enumerate() {
        println!("-- ${}: {}", i + 1, param);
    }
    println!();
    println!("{}", sql);
    Ok(())
}

fn cmd_list(settings: &Settings, mode: Mode) -> Result<(), CliError> {
    let sources = settings.catalog()?.resolve_all(mode);

    println!("Reports:");
    for report in report::catalog(&sources) {
        println!(
            "  - {} (tables: {})",
            report.name(),
            report.required_tables().join(", ")
        );
        println!("      {}", report.title());
    }
    println!();

    println!("Tables ({} mode):", mode);
    for table in TableRegistry::standard(&sources)?.iter() {
        if table.depends_on.is_empty() {
            println!("  - {}", table.name);
        } else {
            println!("  - {} (depends on: {})", table.name, table.depends_on.join(", "));
        }
    }
    println!();

    println!("Datasets ({} mode):", mode);
    for (dataset, source) in sources.iter() {
        println!("  - {}: {}", dataset, source);
    }

    Ok(())
}

/// Build the named report, falling back to the `[analyze]` settings for
/// parameters not given on the command line.
fn build_report(
    name: &str,
    params: &ReportParams,
    defaults: &AnalyzeSettings,
    sources: &ResolvedSources,
) -> Result<Box<dyn Report>, CliError> {
    let report: Box<dyn Report> = match name {
        "row-counts" => Box::new(DatasetRowCounts::new(sources.clone())),
        "stations" => Box::new(StationListing {
            limit: params.limit.unwrap_or(defaults.stations_limit),
        }),
        "distances" => Box::new(DistanceListing {
            limit: params.limit.unwrap_or(defaults.distances_limit),
        }),
        "busiest-by-month" => Box::new(BusiestByMonth {
            month_cutoff: params.month_cutoff.unwrap_or(defaults.month_cutoff),
        }),
        "top-stations" => Box::new(TopStationsInPeriod {
            n: params.top.unwrap_or(defaults.top_n),
            start: params.start.unwrap_or(defaults.top_start),
            end: params.end.unwrap_or(defaults.top_end),
        }),
        "station-pairs" => Box::new(StationPairs {
            order: params.order.map(SortDir::from).unwrap_or(defaults.pairs_order),
            limit: params.limit.unwrap_or(defaults.pairs_limit),
        }),
        other => {
            return Err(CliError::UnknownReport(other.to_string()))
        }
    };
    Ok(report)
}

fn print_table(table: &ResultTable, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_table(table));
            println!();
        }
        OutputFormat::Json => {
            let json = render_json(table)?;
            println!("{}", json);
        }
    }
    Ok(())
}
