//! CLI entry point: run one of the shipped pipelines.
//!
//! Exit contract: 0 when the run reaches `Done`; 1 when it fails, with the
//! triggering error kind logged before exit.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rowforge::{catalog, HttpFetcher, ObservationPipeline, RunReport, TablePipeline};

#[derive(Parser)]
#[command(name = "rowforge", version, about = "Run one of the shipped ETL pipelines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Largest banks by market capitalization, with currency conversions
    Banks(TableArgs),
    /// Countries by nominal GDP, millions scaled to billions
    Gdp(TableArgs),
    /// The fifty most highly ranked films
    Films(TableArgs),
    /// Today's observation/forecast pair for one city
    Weather(WeatherArgs),
}

#[derive(Args)]
struct TableArgs {
    /// Override the source URL
    #[arg(long)]
    url: Option<String>,
    /// Override the flat-file output path
    #[arg(long)]
    out: Option<PathBuf>,
    /// Override the database path
    #[arg(long)]
    db: Option<PathBuf>,
    /// Override the rate-table path (pipelines with conversions)
    #[arg(long)]
    rates: Option<PathBuf>,
}

#[derive(Args)]
struct WeatherArgs {
    /// City queried against wttr.in
    #[arg(long, default_value = "casablanca")]
    city: String,
    /// Override the append-log path
    #[arg(long)]
    out: Option<PathBuf>,
    /// Override the database path
    #[arg(long)]
    db: Option<PathBuf>,
}

fn run_table(
    mut config: rowforge::TablePipelineConfig,
    args: TableArgs,
    fetcher: &HttpFetcher,
) -> rowforge::Result<RunReport> {
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(out) = args.out {
        config.out_path = out;
    }
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let (Some(rates), Some(conversion)) = (args.rates, config.conversion.as_mut()) {
        conversion.rates_path = rates;
    }
    TablePipeline::new(config).run(fetcher)
}

fn run_weather(args: WeatherArgs, fetcher: &HttpFetcher) -> rowforge::Result<RunReport> {
    let mut config = catalog::weather(&args.city);
    if let Some(out) = args.out {
        config.out_path = out;
    }
    if let Some(db) = args.db {
        config.db_path = db;
    }
    ObservationPipeline::new(config).run(fetcher)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let fetcher = match HttpFetcher::default_client() {
        Ok(fetcher) => fetcher,
        Err(err) => {
            tracing::error!(kind = err.kind(), "cannot build HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let result = match cli.command {
        Command::Banks(args) => run_table(catalog::banks(), args, &fetcher),
        Command::Gdp(args) => run_table(catalog::gdp(), args, &fetcher),
        Command::Films(args) => run_table(catalog::films(), args, &fetcher),
        Command::Weather(args) => run_weather(args, &fetcher),
    };

    match result {
        Ok(report) => {
            println!("{}: {} rows loaded", report.pipeline, report.rows_loaded);
            ExitCode::SUCCESS
        }
        // The run already logged the error kind; the exit code is the signal.
        Err(_) => ExitCode::FAILURE,
    }
}
