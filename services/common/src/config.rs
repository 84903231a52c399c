//! Simulation, metrics and data-source configuration
//!
//! Every run receives its configuration explicitly; nothing here is stored in
//! process-wide state.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{calendar, costs, data, numeric};
use crate::errors::{BacktestError, BacktestResult};

/// Cost model and starting capital for the portfolio simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Cash balance before the first order
    pub initial_cash: f64,
    /// Flat fee charged per order
    pub commission: f64,
    /// Fractional price penalty: buyers pay `p * (1 + impact)`, sellers receive `p * (1 - impact)`
    pub impact: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_cash: costs::DEFAULT_INITIAL_CASH,
            commission: costs::DEFAULT_COMMISSION,
            impact: costs::DEFAULT_MARKET_IMPACT,
        }
    }
}

impl SimulationConfig {
    /// Frictionless configuration, mostly useful for tests and what-if runs
    #[must_use]
    pub fn frictionless(initial_cash: f64) -> Self {
        Self {
            initial_cash,
            commission: 0.0,
            impact: 0.0,
        }
    }

    /// Reject values outside the cost model's domain
    pub fn validate(&self) -> BacktestResult<()> {
        if !self.initial_cash.is_finite() {
            return Err(BacktestError::InvalidConfig(format!(
                "initial cash must be finite, got {}",
                self.initial_cash
            )));
        }
        if !(self.commission.is_finite() && self.commission >= 0.0) {
            return Err(BacktestError::InvalidConfig(format!(
                "commission must be a non-negative amount, got {}",
                self.commission
            )));
        }
        if !(self.impact.is_finite() && self.impact >= 0.0) {
            return Err(BacktestError::InvalidConfig(format!(
                "market impact must be a non-negative fraction, got {}",
                self.impact
            )));
        }
        Ok(())
    }
}

/// Annualization and hurdle rate for performance statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Sampling periods per year (252 for daily data)
    pub periods_per_year: u32,
    /// Risk-free rate per sampling period
    pub risk_free_rate: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: calendar::TRADING_DAYS_PER_YEAR,
            risk_free_rate: numeric::DEFAULT_RISK_FREE_RATE,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> BacktestResult<()> {
        if self.periods_per_year == 0 {
            return Err(BacktestError::InvalidConfig(
                "periods per year must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(BacktestError::InvalidConfig(format!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }
}

/// Location and layout of the CSV price files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory containing one `<SYMBOL>.csv` per instrument
    pub data_dir: PathBuf,
    /// Date column header
    pub date_column: String,
    /// Price column header
    pub price_column: String,
    /// Benchmark symbol compared against the fund
    pub benchmark: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(data::DEFAULT_DATA_DIR),
            date_column: data::DEFAULT_DATE_COLUMN.to_string(),
            price_column: data::DEFAULT_PRICE_COLUMN.to_string(),
            benchmark: data::DEFAULT_BENCHMARK.to_string(),
        }
    }
}

/// Top-level configuration for a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub metrics: MetricsConfig,
    pub data: DataConfig,
}

impl AppConfig {
    /// Load configuration from a file, overridden by `BACKTEST_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `BACKTEST_SIMULATION__COMMISSION=0`.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `BACKTEST_*` environment variables only
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> BacktestResult<()> {
        self.simulation.validate()?;
        self.metrics.validate()
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(data::CONFIG_ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}
