use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;

mod config;
mod date;
mod db;
mod error;
mod frequency;
mod matrix;
mod models;
mod pipeline;
mod report;
mod salary;
mod tags;
mod telemetry;

use config::AppConfig;
use db::OfferSource;
use matrix::{MatchMode, MatrixSettings};
use pipeline::PipelineSettings;
use salary::{Aggregate, CutoffField};

#[derive(Parser)]
#[command(name = "offers-dashboard")]
#[command(about = "Salary and skill analytics over scraped IT job offers", long_about = None)]
struct Cli {
    /// Read offers from a CSV export instead of DATABASE_URL
    #[arg(long, global = true)]
    csv: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest posting date in the store
    LatestDate,
    /// Build every dashboard artifact for one date
    Dashboard {
        /// YYYY-MM-DD; defaults to the latest date in the store
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Print the per-day salary trend across all dates
    Trend {
        #[arg(long, value_enum, default_value_t = Aggregate::Mean)]
        aggregate: Aggregate,
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Args)]
struct SettingsArgs {
    /// Drop offers at or above this amount from the salary histogram
    #[arg(long, default_value_t = pipeline::DEFAULT_SALARY_CUTOFF)]
    cutoff: f64,
    #[arg(long, value_enum, default_value_t = CutoffField::Salary)]
    cutoff_field: CutoffField,
    #[arg(long, default_value_t = pipeline::DEFAULT_HISTOGRAM_BINS)]
    bins: usize,
    /// Tags seen fewer times than this are grouped under "other"
    #[arg(long, default_value_t = pipeline::DEFAULT_TAIL_THRESHOLD)]
    tail_threshold: usize,
    #[arg(long, value_enum, default_value_t = Aggregate::Mean)]
    aggregate: Aggregate,
    /// Average reported for skill/level pairs without offers
    #[arg(long, default_value_t = matrix::DEFAULT_SENTINEL)]
    sentinel: f64,
    #[arg(long, value_enum, default_value_t = MatchMode::Exact)]
    match_mode: MatchMode,
}

impl From<SettingsArgs> for PipelineSettings {
    fn from(args: SettingsArgs) -> Self {
        Self {
            cutoff: args.cutoff,
            cutoff_field: args.cutoff_field,
            bins: args.bins,
            tail_threshold: args.tail_threshold,
            aggregate: args.aggregate,
            matrix: MatrixSettings {
                sentinel: args.sentinel,
                match_mode: args.match_mode,
            },
        }
    }
}

async fn connect(config: &AppConfig, csv: Option<PathBuf>) -> anyhow::Result<OfferSource> {
    if let Some(path) = csv {
        tracing::info!(path = %path.display(), "reading offers from CSV snapshot");
        return Ok(OfferSource::Csv(path));
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when no --csv snapshot is given")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(OfferSource::Postgres(pool))
}

fn emit(output: String, out: Option<&PathBuf>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Dashboard written to {}.", path.display());
        }
        None => print!("{output}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.log_level)?;

    let source = connect(&config, cli.csv).await?;

    match cli.command {
        Commands::LatestDate => {
            let offers = source.fetch_offers().await?;
            let latest = pipeline::latest_date(&offers)?;
            println!("{latest}");
        }
        Commands::Dashboard {
            date: selected,
            format,
            out,
            settings,
        } => {
            let selection = selected.as_deref().map(date::parse_selection).transpose()?;
            let settings = PipelineSettings::from(settings);
            let dashboard = pipeline::refresh(&source, selection, &settings).await?;

            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&dashboard)? + "\n",
                OutputFormat::Markdown => report::build_report(&dashboard),
            };
            emit(output, out.as_ref())?;
        }
        Commands::Trend { aggregate, format } => {
            let offers = source.fetch_offers().await?;
            let trend = salary::daily_trend(&offers, aggregate)?;

            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&trend)? + "\n",
                OutputFormat::Markdown => {
                    let mut output = String::new();
                    report::write_trend(&mut output, &trend);
                    output
                }
            };
            emit(output, None)?;
        }
    }

    Ok(())
}
