//! Order types consumed by the portfolio simulator

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::market::Symbol;
use crate::errors::{BacktestError, BacktestResult};

/// Direction of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderAction {
    /// Acquire shares, paying cash
    Buy,
    /// Dispose of shares, receiving cash
    Sell,
}

impl OrderAction {
    /// Signed multiplier applied to share counts
    #[must_use]
    pub const fn direction(self) -> i64 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

impl FromStr for OrderAction {
    type Err = BacktestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let action = raw.trim();
        if action.eq_ignore_ascii_case("BUY") {
            Ok(Self::Buy)
        } else if action.eq_ignore_ascii_case("SELL") {
            Ok(Self::Sell)
        } else {
            Err(BacktestError::InvalidOrder(format!(
                "unknown action '{action}', expected BUY or SELL"
            )))
        }
    }
}

/// A dated instruction to buy or sell whole shares of one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub date: NaiveDate,
    pub symbol: Symbol,
    pub action: OrderAction,
    /// Share count; must be positive to be applied
    pub shares: i64,
}

impl Order {
    /// Create an order without validating it
    #[must_use]
    pub fn new(date: NaiveDate, symbol: impl Into<Symbol>, action: OrderAction, shares: i64) -> Self {
        Self {
            date,
            symbol: symbol.into(),
            action,
            shares,
        }
    }

    /// Convenience constructor for a BUY
    #[must_use]
    pub fn buy(date: NaiveDate, symbol: impl Into<Symbol>, shares: i64) -> Self {
        Self::new(date, symbol, OrderAction::Buy, shares)
    }

    /// Convenience constructor for a SELL
    #[must_use]
    pub fn sell(date: NaiveDate, symbol: impl Into<Symbol>, shares: i64) -> Self {
        Self::new(date, symbol, OrderAction::Sell, shares)
    }

    /// Build an order from untyped fields, validating action and share count
    pub fn parse(date: NaiveDate, symbol: &str, action: &str, shares: i64) -> BacktestResult<Self> {
        let order = Self::new(date, symbol, action.parse()?, shares);
        order.validate()?;
        Ok(order)
    }

    /// Check the order is well formed
    pub fn validate(&self) -> BacktestResult<()> {
        if self.symbol.is_empty() {
            return Err(BacktestError::InvalidOrder(format!(
                "{} order on {} has no symbol",
                self.action, self.date
            )));
        }
        if self.shares <= 0 {
            return Err(BacktestError::InvalidOrder(format!(
                "{} {} on {} has non-positive share count {}",
                self.action, self.symbol, self.date, self.shares
            )));
        }
        Ok(())
    }

    /// Signed change applied to holdings when this order fills
    #[must_use]
    pub const fn signed_shares(&self) -> i64 {
        self.action.direction() * self.shares
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} x{}", self.date, self.action, self.symbol, self.shares)
    }
}
