//! Fund versus benchmark comparison report

use serde::{Deserialize, Serialize};
use services_common::{BacktestError, BacktestResult, MetricsConfig, ValueSeries};
use std::fmt;
use tracing::info;

use crate::performance::PerformanceSummary;

/// Column where statistic values start for short benchmark names
const LABEL_WIDTH: usize = 36;

/// Side-by-side statistics for a simulated fund and its benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Benchmark ticker the fund is compared against
    pub benchmark_symbol: String,
    /// Statistics of the simulated portfolio
    pub fund: PerformanceSummary,
    /// Statistics of the benchmark sampled on the fund's dates
    pub benchmark: PerformanceSummary,
}

impl ComparisonReport {
    /// Summarize both series; they must cover the same dates
    pub fn build(
        fund: &ValueSeries,
        benchmark_symbol: impl Into<String>,
        benchmark: &ValueSeries,
        config: &MetricsConfig,
    ) -> BacktestResult<Self> {
        if !fund.dates().eq(benchmark.dates()) {
            return Err(BacktestError::InvalidPriceTable(
                "benchmark is not aligned to the fund's dates".to_string(),
            ));
        }

        let report = Self {
            benchmark_symbol: benchmark_symbol.into(),
            fund: PerformanceSummary::from_series(fund, config)?,
            benchmark: PerformanceSummary::from_series(benchmark, config)?,
        };

        info!(
            "Report {} to {} - fund return: {}, {} return: {}",
            report.fund.start_date,
            report.fund.end_date,
            Stat(report.fund.cumulative_return),
            report.benchmark_symbol,
            Stat(report.benchmark.cumulative_return)
        );

        Ok(report)
    }
}

struct Stat(Option<f64>);

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:+.11}"),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fund = &self.fund;
        let bench = &self.benchmark;
        let name = &self.benchmark_symbol;

        let rows = [
            ("Sharpe Ratio", fund.sharpe_ratio, bench.sharpe_ratio),
            ("Cumulative Return", fund.cumulative_return, bench.cumulative_return),
            ("Standard Deviation", fund.std_daily_return, bench.std_daily_return),
            ("Average Daily Return", fund.mean_daily_return, bench.mean_daily_return),
            ("Max Drawdown", Some(fund.max_drawdown), Some(bench.max_drawdown)),
        ];
        // "<stat> of <name>: " must fit for the longest benchmark label
        let width = rows
            .iter()
            .map(|(stat, _, _)| stat.len() + name.len() + 6)
            .max()
            .unwrap_or(0)
            .max(LABEL_WIDTH);

        writeln!(f, "--- begin statistics ------------------------------------------------- ")?;
        writeln!(f, "Date Range: {} to {} (portfolio)", fund.start_date, fund.end_date)?;
        writeln!(f, "{:<width$}{:14}", "Number of Trading Days:", fund.trading_days)?;
        for (stat, fund_value, bench_value) in rows {
            writeln!(f, "{:<width$}{}", format!("{stat} of Fund:"), Stat(fund_value))?;
            writeln!(f, "{:<width$}{}", format!("{stat} of {name}:"), Stat(bench_value))?;
        }
        writeln!(f)?;
        write!(f, "Final Portfolio Value:        {:+.11}", fund.final_value)
    }
}
