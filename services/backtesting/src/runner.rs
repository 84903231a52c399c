//! End-to-end backtest run: price table, simulation, benchmark comparison

use chrono::NaiveDate;
use reporting::{ComparisonReport, align_to_dates};
use services_common::{AppConfig, BacktestError, DateRange, Order, Symbol, ValueSeries};
use tracing::{info, warn};

use crate::errors::DataResult;
use crate::market_data::{PriceHistorySource, PriceTableProvider};
use crate::simulator::PortfolioSimulator;

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct BacktestRun {
    /// Daily portfolio values
    pub fund: ValueSeries,
    /// Benchmark levels on the fund's dates
    pub benchmark: ValueSeries,
    /// Statistics for both series
    pub report: ComparisonReport,
    /// Traded symbols the source had no prices for
    pub skipped: Vec<Symbol>,
}

/// Simulate `orders` against prices from `provider` and compare with `benchmark`
///
/// The price table spans the first to the last order date. The benchmark is
/// read from the start of its history so a level printed before the first
/// order date can seed the first fund date. Later fund dates only see prints
/// on fund dates.
pub fn run_backtest<S: PriceHistorySource>(
    orders: &[Order],
    provider: &PriceTableProvider<S>,
    benchmark: &Symbol,
    config: &AppConfig,
) -> DataResult<BacktestRun> {
    config.validate()?;

    let range = DateRange::spanning(orders)?;
    let symbols = traded_symbols(orders);
    info!(
        "Backtest over {} to {}: {} orders in {} symbols",
        range.start,
        range.end,
        orders.len(),
        symbols.len()
    );

    let load = provider.price_table(&symbols, &range)?;
    if !load.skipped.is_empty() {
        warn!("{} traded symbols have no price data", load.skipped.len());
    }

    let simulator = PortfolioSimulator::new(config.simulation.clone())?;
    let fund = simulator.simulate(orders, &load.table)?;

    let history_range = DateRange::new(NaiveDate::MIN, range.end)?;
    let history = provider.history(benchmark, &history_range)?.ok_or_else(|| {
        BacktestError::EmptyInput(format!("no price data for benchmark {benchmark}"))
    })?;
    let benchmark_series = align_to_dates(benchmark, &history, fund.dates())?;

    let report = ComparisonReport::build(
        &fund,
        benchmark.as_str(),
        &benchmark_series,
        &config.metrics,
    )?;

    Ok(BacktestRun {
        fund,
        benchmark: benchmark_series,
        report,
        skipped: load.skipped,
    })
}

/// Distinct symbols in first-traded order
pub fn traded_symbols(orders: &[Order]) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = Vec::new();
    for order in orders {
        if !symbols.contains(&order.symbol) {
            symbols.push(order.symbol.clone());
        }
    }
    symbols
}
