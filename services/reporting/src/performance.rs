//! Performance analytics over value series
//!
//! Pure reductions: daily returns, cumulative return, return dispersion,
//! annualized Sharpe ratio and maximum drawdown. None of these functions hold
//! state, so the fund and its benchmark go through exactly the same code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use services_common::constants::numeric::MIN_DISPERSION;
use services_common::{BacktestError, BacktestResult, MetricsConfig, ValueSeries};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

/// Lazy `value[t] / value[t-1] - 1` sequence over a slice of values
///
/// The first observation has no predecessor and yields nothing. Non-finite
/// ratios (zero denominators) come out as `0.0`. The iterator only borrows
/// its input, so calling [`daily_returns`] again replays the same sequence.
#[derive(Debug, Clone)]
pub struct DailyReturns<'a> {
    values: &'a [f64],
    next: usize,
}

impl Iterator for DailyReturns<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let current = *self.values.get(self.next)?;
        let previous = self.values[self.next - 1];
        self.next += 1;

        let ret = current / previous - 1.0;
        Some(if ret.is_finite() { ret } else { 0.0 })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.values.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DailyReturns<'_> {}

/// Daily returns of `values`, one fewer than the number of values
#[must_use]
pub fn daily_returns(values: &[f64]) -> DailyReturns<'_> {
    DailyReturns { values, next: 1 }
}

/// Total return from the first to the last value
pub fn cumulative_return(values: &[f64]) -> BacktestResult<f64> {
    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return Err(BacktestError::EmptyInput(
            "cumulative return needs at least one value".to_string(),
        ));
    };

    let ret = last / first - 1.0;
    if !ret.is_finite() {
        return Err(BacktestError::DegenerateSeries(format!(
            "cumulative return undefined for starting value {first}"
        )));
    }
    Ok(ret)
}

/// Arithmetic mean of the returns
pub fn mean_daily_return(returns: &[f64]) -> BacktestResult<f64> {
    if returns.is_empty() {
        return Err(BacktestError::EmptyInput(
            "mean of an empty return series".to_string(),
        ));
    }
    Ok(returns.mean())
}

/// Sample standard deviation (n - 1 denominator) of the returns
pub fn std_daily_return(returns: &[f64]) -> BacktestResult<f64> {
    if returns.len() < 2 {
        return Err(BacktestError::DegenerateSeries(format!(
            "standard deviation needs at least two returns, got {}",
            returns.len()
        )));
    }
    Ok(returns.std_dev())
}

/// Annualized Sharpe ratio: `(mean - rf) / std * sqrt(periods_per_year)`
///
/// `config.risk_free_rate` is a per-period rate. A return series without
/// dispersion has no defined ratio and is reported as
/// [`BacktestError::DegenerateSeries`] rather than an infinite value.
pub fn sharpe_ratio(returns: &[f64], config: &MetricsConfig) -> BacktestResult<f64> {
    let mean = mean_daily_return(returns)?;
    let std = std_daily_return(returns)?;

    if std.is_nan() || std <= MIN_DISPERSION {
        return Err(BacktestError::DegenerateSeries(format!(
            "return series has no dispersion (std = {std:e})"
        )));
    }

    let annualization = f64::from(config.periods_per_year).sqrt();
    Ok((mean - config.risk_free_rate) / std * annualization)
}

/// Largest peak-to-trough decline as a fraction of the peak
#[must_use]
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut max_drawdown = 0.0;
    let mut peak = f64::NEG_INFINITY;

    for value in values {
        if *value > peak {
            peak = *value;
        }
        if peak > 0.0 {
            let drawdown = (peak - value) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}

/// Standard fund-performance statistics for one value series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// First observation date
    pub start_date: NaiveDate,
    /// Last observation date
    pub end_date: NaiveDate,
    /// Number of observations
    pub trading_days: usize,
    /// First value
    pub start_value: f64,
    /// Last value
    pub final_value: f64,
    /// Total return over the whole series, absent when the first value is zero
    pub cumulative_return: Option<f64>,
    /// Mean daily return, absent with fewer than two observations
    pub mean_daily_return: Option<f64>,
    /// Sample standard deviation of daily returns, absent with fewer than two returns
    pub std_daily_return: Option<f64>,
    /// Annualized Sharpe ratio, absent when the returns have no dispersion
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough decline
    pub max_drawdown: f64,
}

impl PerformanceSummary {
    /// Summarize a value series
    pub fn from_series(series: &ValueSeries, config: &MetricsConfig) -> BacktestResult<Self> {
        config.validate()?;

        let (Some((start_date, start_value)), Some((end_date, final_value))) =
            (series.first(), series.last())
        else {
            return Err(BacktestError::EmptyInput(
                "cannot summarize an empty series".to_string(),
            ));
        };

        let values = series.values();
        let returns: Vec<f64> = daily_returns(&values).collect();

        let sharpe_ratio = match sharpe_ratio(&returns, config) {
            Ok(ratio) => Some(ratio),
            Err(err) => {
                warn!("Sharpe ratio undefined for series {start_date}..{end_date}: {err}");
                None
            }
        };

        let cumulative_return = match cumulative_return(&values) {
            Ok(ret) => Some(ret),
            Err(err) => {
                warn!("Cumulative return undefined for series {start_date}..{end_date}: {err}");
                None
            }
        };

        let summary = Self {
            start_date,
            end_date,
            trading_days: series.len(),
            start_value,
            final_value,
            cumulative_return,
            mean_daily_return: mean_daily_return(&returns).ok(),
            std_daily_return: std_daily_return(&returns).ok(),
            sharpe_ratio,
            max_drawdown: max_drawdown(&values),
        };

        debug!(
            "Summary {}..{} - days: {}, cumulative: {:?}, sharpe: {:?}",
            summary.start_date,
            summary.end_date,
            summary.trading_days,
            summary.cumulative_return,
            summary.sharpe_ratio
        );

        Ok(summary)
    }
}
