//! climo-bot: Kalshi temperature-market mispricing scanner.
//!
//! Single-binary Tokio application that:
//! 1. Loads decades of archived daily-high temperatures for a site
//! 2. Trains a day-of-year climatology model
//! 3. Fetches listed Kalshi temperature contracts
//! 4. Prices each contract against the model
//! 5. Reports the best-ranked discrepancies

mod config;
mod report;

use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use climatology::{ClimatologyModel, DEFAULT_PERCENTILES};
use common::config::HistoryConfig;
use common::{BotConfig, Result};
use kalshi_client::{ContractParser, KalshiRestClient};
use mispricing::{rank_opportunities, MispricingAnalyzer};
use open_meteo_client::ArchiveClient;

/// Kalshi temperature-market mispricing scanner.
#[derive(Parser)]
#[command(name = "climo-bot", about = "Kalshi temperature-market mispricing scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the climatological forecast for a date.
    Forecast {
        /// Target date (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
    },
    /// Scan listed markets for mispriced contracts.
    Scan {
        /// Minimum edge to report (overrides config).
        #[arg(long)]
        min_edge: Option<f64>,
        /// Minimum traded volume (overrides config).
        #[arg(long)]
        min_volume: Option<i64>,
        /// Cap on reported opportunities (overrides config).
        #[arg(long)]
        max_results: Option<usize>,
        /// Market status filter (overrides config).
        #[arg(long)]
        status: Option<String>,
    },
    /// Analyze a single market by ticker.
    Analyze {
        #[arg(long)]
        ticker: String,
    },
    /// Probe both upstream APIs and exit.
    Check,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "climo_bot=info,climatology=info,kalshi_client=info,open_meteo_client=info,mispricing=info"
                    .into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Site: {} ({:.2}, {:.2}) → series {}",
        cfg.location.name, cfg.location.latitude, cfg.location.longitude, cfg.location.series_ticker
    );
    info!(
        "Model: window=±{}d, min_samples={}, ε={}, history {}→{}",
        cfg.model.window,
        cfg.model.min_samples,
        cfg.model.epsilon,
        cfg.history.start_date,
        cfg.history.end_date
    );

    let result = match cli.command {
        Command::Forecast { date } => run_forecast(&cfg, date).await,
        Command::Scan {
            min_edge,
            min_volume,
            max_results,
            status,
        } => {
            let mut cfg = cfg;
            if let Some(v) = min_edge {
                cfg.scan.min_edge = v;
            }
            if let Some(v) = min_volume {
                cfg.scan.min_volume = v;
            }
            if let Some(v) = max_results {
                cfg.scan.max_results = v;
            }
            if let Some(v) = status {
                cfg.scan.status = v;
            }
            run_scan(&cfg).await
        }
        Command::Analyze { ticker } => run_analyze(&cfg, &ticker).await,
        Command::Check => run_check(&cfg).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Load history and train the model, shared by every subcommand that
/// needs probabilities.
async fn train_model(cfg: &BotConfig) -> Result<ClimatologyModel> {
    let archive = ArchiveClient::new();
    info!("Loading historical temperature data...");
    let observations = archive
        .fetch_daily_highs(&cfg.location, &cfg.history)
        .await?;
    info!("Training climatology model on {} observations...", observations.len());
    ClimatologyModel::train(&observations, &cfg.model)
}

async fn run_forecast(cfg: &BotConfig, date: NaiveDate) -> Result<()> {
    let model = train_model(cfg).await?;
    let (mean, std_dev) = model.forecast(date)?;
    let percentiles = model.percentiles(date, &DEFAULT_PERCENTILES)?;
    println!("{}", report::render_forecast(date, mean, std_dev, &percentiles));
    Ok(())
}

async fn run_scan(cfg: &BotConfig) -> Result<()> {
    let model = train_model(cfg).await?;

    let kalshi = KalshiRestClient::new();
    info!(
        "Fetching {} markets for series {}...",
        cfg.scan.status, cfg.location.series_ticker
    );
    let markets = kalshi
        .get_markets(
            Some(&cfg.location.series_ticker),
            Some(&cfg.scan.status),
            200,
        )
        .await?;
    info!("Found {} markets", markets.len());

    let parser = ContractParser::new();
    let today = Utc::now().date_naive();
    let contracts: Vec<_> = markets.iter().map(|m| parser.parse(m, today)).collect();

    let analyzer = MispricingAnalyzer::new(&model);
    let ranked = rank_opportunities(
        &analyzer,
        &contracts,
        cfg.scan.min_edge,
        cfg.scan.min_volume,
        cfg.scan.max_results,
    );
    info!(
        "{} of {} contracts pass the filters",
        ranked.len(),
        contracts.len()
    );

    println!(
        "{}",
        report::render_opportunities(&ranked, cfg.scan.min_edge, cfg.scan.min_volume)
    );
    Ok(())
}

async fn run_analyze(cfg: &BotConfig, ticker: &str) -> Result<()> {
    let kalshi = KalshiRestClient::new();
    let market = kalshi.get_market(ticker).await?;

    let parser = ContractParser::new();
    let contract = parser.parse(&market, Utc::now().date_naive());

    let model = train_model(cfg).await?;
    let analyzer = MispricingAnalyzer::new(&model);
    let analysis = analyzer.analyze(&contract);

    println!("{}", report::render_analysis(&analysis));

    if let Some(date) = contract.target_date {
        let (mean, std_dev) = model.forecast(date)?;
        let percentiles = model.percentiles(date, &DEFAULT_PERCENTILES)?;
        println!("{}", report::render_forecast(date, mean, std_dev, &percentiles));
    } else {
        warn!("No target date recoverable from title; forecast skipped");
    }

    Ok(())
}

async fn run_check(cfg: &BotConfig) -> Result<()> {
    info!("Checking Open-Meteo archive...");
    let archive = ArchiveClient::new();
    let recent = HistoryConfig {
        start_date: cfg.history.end_date - Duration::days(7),
        end_date: cfg.history.end_date,
    };
    match archive.fetch_daily_highs(&cfg.location, &recent).await {
        Ok(obs) => info!("✅ Archive OK: {} recent observations", obs.len()),
        Err(e) => {
            error!("❌ Archive check failed: {}", e);
            return Err(e);
        }
    }

    info!("Checking Kalshi market data...");
    let kalshi = KalshiRestClient::new();
    match kalshi
        .get_markets(Some(&cfg.location.series_ticker), Some("open"), 200)
        .await
    {
        Ok(markets) => info!(
            "✅ Kalshi OK: {} open markets for {}",
            markets.len(),
            cfg.location.series_ticker
        ),
        Err(e) => {
            error!("❌ Kalshi check failed: {}", e);
            return Err(e);
        }
    }

    info!("All checks passed");
    Ok(())
}
