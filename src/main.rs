//! robinfolio command line
//!
//! Brokerage calls print the raw JSON response. Reports and snapshots go to
//! stdout, logs go to stderr.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use robinfolio::application::{PortfolioReporter, render_text};
use robinfolio::config::{BrokerCapability, Config};
use robinfolio::domain::dilution::{DILUTION_THRESHOLD, dilution_alerts};
use robinfolio::domain::market::OhlcvQuery;
use robinfolio::domain::ports::QuoteProvider;
use robinfolio::infrastructure::robinhood::{generate_keypair, get_price, public_key_for};
use robinfolio::infrastructure::{CoinMarketCapClient, RobinhoodClient, SnapshotOutcome, SnapshotStore};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Robinhood Crypto portfolio tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new Ed25519 key pair for API credentials
    GenerateKeys,
    /// Print the public key of the configured private key
    PublicKey,
    /// Fetch the trading account to check credentials
    TestConnection,
    /// Show holdings, optionally filtered by asset code
    ViewHoldings {
        /// Asset codes (e.g. BTC ETH)
        assets: Vec<String>,
    },
    /// Current price of a trading pair from best bid/ask
    Price {
        /// Trading pair, e.g. BTC-USD
        symbol: String,
    },
    /// Holdings enriched with market quotes
    Portfolio,
    /// Write today's snapshot to the log directory
    Snapshot {
        /// Replace an existing snapshot for today
        #[arg(long)]
        overwrite: bool,

        /// Snapshot root directory (defaults to SNAPSHOT_LOG_DIR or ./logs)
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// Historical OHLCV candles for a coin
    History {
        /// Coin symbol, e.g. BTC
        symbol: String,

        /// Start of range (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: Option<String>,

        /// End of range (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        end: Option<String>,

        /// Candle interval
        #[arg(long, default_value = "daily")]
        interval: String,
    },
    /// Holdings flagged for dilution in a stored snapshot
    Dilution {
        /// Snapshot date (YYYY-MM-DD), defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Snapshot root directory (defaults to SNAPSHOT_LOG_DIR or ./logs)
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::GenerateKeys => {
            let pair = generate_keypair();
            println!("Private key (add to .env as BASE64_PRIVATE_KEY, keep secret):");
            println!("{}\n", pair.private_key_b64);
            println!("Public key (register with the Robinhood API credentials portal):");
            println!("{}", pair.public_key_b64);
        }
        Commands::PublicKey => {
            let Some(private_key) = config.robinhood.private_key_b64.as_deref() else {
                bail!("BASE64_PRIVATE_KEY is not set");
            };
            println!("{}", public_key_for(private_key)?);
        }
        Commands::TestConnection => {
            let client = broker(&config)?;
            print_json(&client.get_account().await?)?;
        }
        Commands::ViewHoldings { assets } => {
            let client = broker(&config)?;
            let codes: Vec<&str> = assets.iter().map(String::as_str).collect();
            print_json(&client.get_holdings(&codes, None, None).await?)?;
        }
        Commands::Price { symbol } => {
            let client = broker(&config)?;
            let price = get_price(&client, &symbol).await?;
            println!("{}: {}", symbol, price);
        }
        Commands::Portfolio => {
            let client = broker(&config)?;
            let cmc = CoinMarketCapClient::from_config(&config.coinmarketcap)?;
            let reporter = PortfolioReporter::new(&client, cmc.as_ref().map(|c| c as &dyn QuoteProvider));

            let rows = reporter.enriched_holdings().await?;
            print!("{}", render_text(&rows));
        }
        Commands::Snapshot { overwrite, log_dir } => {
            let now = Utc::now();
            let store = SnapshotStore::new(log_dir.unwrap_or_else(|| config.snapshot.log_dir.clone()));
            if store.exists(now.date_naive()) && !overwrite {
                println!(
                    "Snapshot already exists at {} (use --overwrite)",
                    store.path_for(now.date_naive()).display()
                );
                return Ok(());
            }

            let client = broker(&config)?;
            let cmc = CoinMarketCapClient::from_config(&config.coinmarketcap)?;
            let reporter = PortfolioReporter::new(&client, cmc.as_ref().map(|c| c as &dyn QuoteProvider));

            let snapshot = reporter
                .build_snapshot(
                    now,
                    config.snapshot.top_listings_limit,
                    &config.snapshot.convert,
                )
                .await?;

            match store.write(&snapshot, overwrite)? {
                SnapshotOutcome::Written(path) => println!("Snapshot written to {}", path.display()),
                SnapshotOutcome::Skipped(path) => {
                    println!("Snapshot already exists at {} (use --overwrite)", path.display())
                }
            }
        }
        Commands::History {
            symbol,
            start,
            end,
            interval,
        } => {
            let Some(cmc) = CoinMarketCapClient::from_config(&config.coinmarketcap)? else {
                bail!("CMC_API_KEY is not set");
            };
            let query = OhlcvQuery {
                symbol,
                time_start: start,
                time_end: end,
                interval,
            };

            let series = cmc.historical_ohlcv(&query).await?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Commands::Dilution { date, log_dir } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let store = SnapshotStore::new(log_dir.unwrap_or_else(|| config.snapshot.log_dir.clone()));
            let snapshot = store.load(date)?;

            let alerts = dilution_alerts(&snapshot);
            if alerts.is_empty() {
                println!("No holdings above FDV/MC {:.1} on {}", DILUTION_THRESHOLD, date);
            }
            for alert in alerts {
                println!("{:<10} FDV/MC {:.2}", alert.symbol, alert.ratio);
            }
        }
    }

    Ok(())
}

fn broker(config: &Config) -> Result<RobinhoodClient> {
    if config.broker_capability() == BrokerCapability::Unauthenticated {
        warn!("Brokerage credentials missing; signed calls will fail");
    }
    let client = RobinhoodClient::new(&config.robinhood)?;
    info!("Robinhood client ready ({})", config.robinhood.base_url);
    Ok(client)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
