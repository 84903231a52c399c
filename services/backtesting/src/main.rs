//! Backtesting CLI
//!
//! Usage:
//!   backtesting run --orders orders.csv --data-dir data [--benchmark '$SPX'] [--json]

use anyhow::{Context, Result};
use backtesting::{CsvDirectorySource, CsvOrderFile, PriceTableProvider, run_backtest};
use clap::{Parser, Subcommand};
use services_common::{AppConfig, Symbol};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "backtesting")]
#[command(about = "Replay an order file against historical prices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate an order file and compare it with a benchmark
    Run {
        /// CSV file with Date,Symbol,Order,Shares columns
        #[arg(long)]
        orders: PathBuf,
        /// Directory of <SYMBOL>.csv price files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Benchmark symbol (default $SPX)
        #[arg(long)]
        benchmark: Option<String>,
        /// Configuration file; BACKTEST_* environment variables still apply
        #[arg(long)]
        config: Option<String>,
        /// Starting cash
        #[arg(long)]
        initial_cash: Option<f64>,
        /// Flat fee per order
        #[arg(long)]
        commission: Option<f64>,
        /// Market impact as a fraction of price
        #[arg(long)]
        impact: Option<f64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            orders,
            data_dir,
            benchmark,
            config,
            initial_cash,
            commission,
            impact,
            json,
        } => {
            let mut app_config = match config {
                Some(path) => AppConfig::from_file(&path)
                    .with_context(|| format!("Failed to load configuration from {path}"))?,
                None => AppConfig::from_env().context("Failed to load configuration")?,
            };

            if let Some(dir) = data_dir {
                app_config.data.data_dir = dir;
            }
            if let Some(symbol) = benchmark {
                app_config.data.benchmark = symbol;
            }
            if let Some(cash) = initial_cash {
                app_config.simulation.initial_cash = cash;
            }
            if let Some(fee) = commission {
                app_config.simulation.commission = fee;
            }
            if let Some(impact) = impact {
                app_config.simulation.impact = impact;
            }
            app_config.validate().context("Invalid configuration")?;

            info!("Starting backtest of {}", orders.display());

            let order_list = CsvOrderFile::load(&orders)
                .with_context(|| format!("Failed to read orders from {}", orders.display()))?;
            let provider =
                PriceTableProvider::new(CsvDirectorySource::from_config(&app_config.data));
            let benchmark = Symbol::new(&app_config.data.benchmark);

            let run = run_backtest(&order_list, &provider, &benchmark, &app_config)
                .context("Backtest failed")?;

            if json {
                let rendered = serde_json::to_string_pretty(&run.report)
                    .context("Failed to serialize report")?;
                println!("{rendered}");
            } else {
                println!("{}", run.report);
            }
        }
    }

    Ok(())
}
