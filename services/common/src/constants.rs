//! Common constants used across all services
//!
//! Single source of truth for simulation and reporting defaults

/// Trading calendar constants
pub mod calendar {
    /// Trading sessions per year used to annualize daily statistics
    pub const TRADING_DAYS_PER_YEAR: u32 = 252;
}

/// Cost model defaults for the portfolio simulator
pub mod costs {
    /// Starting cash balance when none is configured
    pub const DEFAULT_INITIAL_CASH: f64 = 1_000_000.0;
    /// Flat fee charged per executed order
    pub const DEFAULT_COMMISSION: f64 = 9.95;
    /// Fraction of the fill price lost to market impact
    pub const DEFAULT_MARKET_IMPACT: f64 = 0.005;
}

/// Numeric thresholds for metric derivation
pub mod numeric {
    /// Dispersion below which a return series is treated as constant
    pub const MIN_DISPERSION: f64 = 1e-12;
    /// Per-period risk-free rate applied when none is configured
    pub const DEFAULT_RISK_FREE_RATE: f64 = 0.0;
}

/// Price history file layout
pub mod data {
    /// Directory holding `<SYMBOL>.csv` price files
    pub const DEFAULT_DATA_DIR: &str = "data";
    /// Header of the date column in price and order files
    pub const DEFAULT_DATE_COLUMN: &str = "Date";
    /// Header of the price column used for valuation
    pub const DEFAULT_PRICE_COLUMN: &str = "Adj Close";
    /// Benchmark index compared against the simulated fund
    pub const DEFAULT_BENCHMARK: &str = "$SPX";
    /// Environment prefix for configuration overrides
    pub const CONFIG_ENV_PREFIX: &str = "BACKTEST";
}
