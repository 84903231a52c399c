//! Backtesting Service
//!
//! Replays a dated order list against historical prices and values the
//! resulting portfolio day by day.
//!
//! - [`simulator`]: the portfolio valuation loop
//! - [`admission`]: pluggable checks run before each fill
//! - [`market_data`]: price history sources and the inner-joined price table
//! - [`orders`]: CSV order files
//! - [`runner`]: the full pipeline through the benchmark comparison report

pub mod admission;
pub mod errors;
pub mod market_data;
pub mod orders;
pub mod portfolio;
pub mod runner;
pub mod simulator;

pub use admission::{AdmitAll, OrderAdmission};
pub use errors::{DataError, DataResult};
pub use market_data::{
    CsvDirectorySource, InMemorySource, PriceHistorySource, PriceTableLoad, PriceTableProvider,
};
pub use orders::{CsvOrderFile, OrderSource, read_orders};
pub use portfolio::PortfolioState;
pub use runner::{BacktestRun, run_backtest, traded_symbols};
pub use simulator::{PortfolioSimulator, simulate};
