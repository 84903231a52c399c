//! Market data types: symbols, per-symbol price histories and the joined price table

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{BacktestError, BacktestResult};

/// Ticker symbol of a traded instrument
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol, trimming surrounding whitespace
    #[must_use]
    pub fn new(ticker: impl AsRef<str>) -> Self {
        Self(ticker.as_ref().trim().to_string())
    }

    /// Ticker as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the ticker is empty after trimming
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(ticker: &str) -> Self {
        Self::new(ticker)
    }
}

impl From<String> for Symbol {
    fn from(ticker: String) -> Self {
        Self::new(ticker)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Date-keyed closing prices for one symbol
pub type PriceHistory = BTreeMap<NaiveDate, f64>;

/// Dates x symbols grid of prices with no missing cells
///
/// Dates are strictly ascending. Every symbol column holds exactly one
/// positive, finite price per date.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<Symbol>,
    /// Column-major: `columns[i]` belongs to `symbols[i]`
    columns: Vec<Vec<f64>>,
    symbol_index: FxHashMap<Symbol, usize>,
    date_index: FxHashMap<NaiveDate, usize>,
}

impl PriceTable {
    /// Build a table from explicit dates and per-symbol columns
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<(Symbol, Vec<f64>)>) -> BacktestResult<Self> {
        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(BacktestError::InvalidPriceTable(format!(
                "dates must be strictly ascending, found {} before {}",
                pair[0], pair[1]
            )));
        }

        let mut symbols = Vec::with_capacity(columns.len());
        let mut prices = Vec::with_capacity(columns.len());
        let mut symbol_index = FxHashMap::default();

        for (symbol, column) in columns {
            if symbol.is_empty() {
                return Err(BacktestError::InvalidPriceTable(
                    "symbol column with empty ticker".to_string(),
                ));
            }
            if column.len() != dates.len() {
                return Err(BacktestError::InvalidPriceTable(format!(
                    "column {} has {} prices for {} dates",
                    symbol,
                    column.len(),
                    dates.len()
                )));
            }
            if let Some((row, price)) = column
                .iter()
                .enumerate()
                .find(|(_, price)| !(price.is_finite() && **price > 0.0))
            {
                return Err(BacktestError::InvalidPriceTable(format!(
                    "price {} for {} on {} is not positive and finite",
                    price, symbol, dates[row]
                )));
            }
            if symbol_index.insert(symbol.clone(), symbols.len()).is_some() {
                return Err(BacktestError::InvalidPriceTable(format!(
                    "duplicate column for {symbol}"
                )));
            }
            symbols.push(symbol);
            prices.push(column);
        }

        let date_index = dates.iter().enumerate().map(|(row, date)| (*date, row)).collect();

        Ok(Self {
            dates,
            symbols,
            columns: prices,
            symbol_index,
            date_index,
        })
    }

    /// Inner-join per-symbol histories on their common dates
    ///
    /// Only dates present in every history survive. An empty input yields an
    /// empty table.
    pub fn inner_join(histories: Vec<(Symbol, PriceHistory)>) -> BacktestResult<Self> {
        let Some((_, first)) = histories.first() else {
            return Ok(Self::default());
        };

        let dates: Vec<NaiveDate> = first
            .keys()
            .filter(|date| histories.iter().all(|(_, history)| history.contains_key(date)))
            .copied()
            .collect();

        let columns = histories
            .into_iter()
            .map(|(symbol, history)| {
                let column = dates.iter().map(|date| history[date]).collect();
                (symbol, column)
            })
            .collect();

        Self::new(dates, columns)
    }

    /// Trading dates in ascending order
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Symbol columns in insertion order
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of dates
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the table holds no dates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// True when the table carries a column for `symbol`
    #[must_use]
    pub fn has_symbol(&self, symbol: &Symbol) -> bool {
        self.column_of(symbol).is_some()
    }

    /// Row index of `date`, if it is a table date
    #[must_use]
    pub fn row_of(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    /// Column index of `symbol`, if present
    #[must_use]
    pub fn column_of(&self, symbol: &Symbol) -> Option<usize> {
        self.symbol_index.get(symbol).copied()
    }

    /// Price at a (row, column) position
    #[must_use]
    pub fn price_at(&self, row: usize, column: usize) -> Option<f64> {
        self.columns.get(column)?.get(row).copied()
    }

    /// Price of `symbol` on `date`
    pub fn price(&self, date: NaiveDate, symbol: &Symbol) -> BacktestResult<f64> {
        self.row_of(date)
            .zip(self.column_of(symbol))
            .and_then(|(row, column)| self.price_at(row, column))
            .ok_or_else(|| BacktestError::MissingPrice {
                symbol: symbol.clone(),
                date,
            })
    }

    /// Full price column of `symbol`
    #[must_use]
    pub fn column(&self, symbol: &Symbol) -> Option<&[f64]> {
        self.column_of(symbol).map(|column| self.columns[column].as_slice())
    }
}

impl PartialEq for PriceTable {
    fn eq(&self, other: &Self) -> bool {
        self.dates == other.dates && self.symbols == other.symbols && self.columns == other.columns
    }
}
