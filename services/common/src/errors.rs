//! Common error types for services

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::Symbol;

/// Errors raised while simulating a portfolio or deriving its statistics
///
/// Every variant is fatal to the run that produced it. Nothing is retried and
/// no partially computed series is ever handed back alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    /// Malformed order (non-positive shares, unknown action)
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// A price needed for a fill or a valuation is absent from the table
    #[error("Missing price for {symbol} on {date}")]
    MissingPrice {
        /// Symbol whose price was requested
        symbol: Symbol,
        /// Date the price was requested for
        date: NaiveDate,
    },

    /// Statistic undefined for the given series
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// Input has no elements where at least one is required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Price table violates its ordering or completeness invariants
    #[error("Invalid price table: {0}")]
    InvalidPriceTable(String),

    /// Order refused by the configured admissibility policy
    #[error("Order rejected on {date} ({symbol}): {reason}")]
    OrderRejected {
        /// Date of the refused order
        date: NaiveDate,
        /// Symbol of the refused order
        symbol: Symbol,
        /// Policy explanation
        reason: String,
    },

    /// Configuration value outside its allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for simulation and metric operations
pub type BacktestResult<T> = std::result::Result<T, BacktestError>;
