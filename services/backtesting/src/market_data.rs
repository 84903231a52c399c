//! Price history sources and the inner-join price table provider

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use services_common::{DataConfig, DateRange, PriceHistory, PriceTable, Symbol};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{DataError, DataResult};

/// Row parse failures logged individually before switching to a summary
const MAX_LOGGED_ROW_ERRORS: usize = 10;

/// Supplier of per-symbol price history
pub trait PriceHistorySource {
    /// Prices of `symbol` within `range`
    ///
    /// `Ok(None)` means the source has nothing at all for the symbol (for
    /// example no file), which callers treat as "skip this symbol".
    fn load(&self, symbol: &Symbol, range: &DateRange) -> DataResult<Option<PriceHistory>>;
}

/// Price histories held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    histories: FxHashMap<Symbol, PriceHistory>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the history of `symbol`
    #[must_use]
    pub fn with_history(mut self, symbol: impl Into<Symbol>, history: PriceHistory) -> Self {
        self.histories.insert(symbol.into(), history);
        self
    }
}

impl PriceHistorySource for InMemorySource {
    fn load(&self, symbol: &Symbol, range: &DateRange) -> DataResult<Option<PriceHistory>> {
        Ok(self.histories.get(symbol).map(|history| {
            history
                .range(range.start..=range.end)
                .map(|(date, price)| (*date, *price))
                .collect()
        }))
    }
}

/// Directory of `<SYMBOL>.csv` files with a date column and a price column
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
    date_column: String,
    price_column: String,
}

impl CsvDirectorySource {
    #[must_use]
    pub fn new(
        dir: impl Into<PathBuf>,
        date_column: impl Into<String>,
        price_column: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            date_column: date_column.into(),
            price_column: price_column.into(),
        }
    }

    /// Source laid out as described by `config`
    #[must_use]
    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.data_dir, &config.date_column, &config.price_column)
    }

    /// File expected to hold the prices of `symbol`
    #[must_use]
    pub fn path_for(&self, symbol: &Symbol) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn read_file(&self, path: &Path, range: &DateRange) -> DataResult<PriceHistory> {
        let location = path.display().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|source| DataError::Csv {
            location: location.clone(),
            source,
        })?;

        let headers = reader
            .headers()
            .map_err(|source| DataError::Csv {
                location: location.clone(),
                source,
            })?
            .clone();
        let date_idx = column_index(&headers, &self.date_column, &location)?;
        let price_idx = column_index(&headers, &self.price_column, &location)?;

        let mut history = PriceHistory::new();
        let mut error_count = 0;

        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|source| DataError::Csv {
                location: location.clone(),
                source,
            })?;

            let date = record.get(date_idx).and_then(parse_date);
            let price = record.get(price_idx).and_then(parse_price);

            match (date, price) {
                (Some(date), Some(price)) => {
                    if range.contains(date) {
                        history.insert(date, price);
                    }
                }
                _ => {
                    error_count += 1;
                    if error_count <= MAX_LOGGED_ROW_ERRORS {
                        // header is line 1
                        warn!("Skipping unusable price row {} in {}", line + 2, location);
                    }
                }
            }
        }

        if error_count > 0 {
            warn!("Total skipped price rows in {}: {}", location, error_count);
        }

        debug!("Read {} prices from {}", history.len(), location);
        Ok(history)
    }
}

impl PriceHistorySource for CsvDirectorySource {
    fn load(&self, symbol: &Symbol, range: &DateRange) -> DataResult<Option<PriceHistory>> {
        let path = self.path_for(symbol);
        match path.try_exists() {
            Ok(true) => self.read_file(&path, range).map(Some),
            Ok(false) => Ok(None),
            Err(source) => Err(DataError::Io { path, source }),
        }
    }
}

/// Outcome of building a price table
#[derive(Debug, Clone)]
pub struct PriceTableLoad {
    /// Inner join of every symbol that had data; empty when none did
    pub table: PriceTable,
    /// Requested symbols the source had no data for
    pub skipped: Vec<Symbol>,
}

/// Builds price tables restricted to dates every requested symbol traded on
#[derive(Debug, Clone)]
pub struct PriceTableProvider<S> {
    source: S,
}

impl<S: PriceHistorySource> PriceTableProvider<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Underlying history source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Inner-joined prices of `symbols` over `range`
    ///
    /// Symbols without data are skipped and reported in
    /// [`PriceTableLoad::skipped`]. If no symbol has data the table is empty.
    pub fn price_table(&self, symbols: &[Symbol], range: &DateRange) -> DataResult<PriceTableLoad> {
        let mut histories: Vec<(Symbol, PriceHistory)> = Vec::with_capacity(symbols.len());
        let mut skipped: Vec<Symbol> = Vec::new();

        for symbol in symbols {
            if histories.iter().any(|(seen, _)| seen == symbol) || skipped.contains(symbol) {
                continue;
            }
            match self.source.load(symbol, range)? {
                Some(history) => histories.push((symbol.clone(), history)),
                None => {
                    warn!("No price data for symbol '{}'. Skipping...", symbol);
                    skipped.push(symbol.clone());
                }
            }
        }

        if histories.is_empty() {
            warn!("No valid price data was loaded for {} symbols", symbols.len());
            return Ok(PriceTableLoad {
                table: PriceTable::default(),
                skipped,
            });
        }

        let loaded: Vec<String> = histories.iter().map(|(symbol, _)| symbol.to_string()).collect();
        let table = PriceTable::inner_join(histories)?;

        info!(
            "Loaded prices for {} over {} common dates ({} to {})",
            loaded.join(", "),
            table.len(),
            range.start,
            range.end
        );

        Ok(PriceTableLoad { table, skipped })
    }

    /// Single-symbol history, used for benchmarks
    pub fn history(&self, symbol: &Symbol, range: &DateRange) -> DataResult<Option<PriceHistory>> {
        self.source.load(symbol, range)
    }
}

fn column_index(headers: &csv::StringRecord, column: &str, location: &str) -> DataResult<usize> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| DataError::MissingColumn {
            location: location.to_string(),
            column: column.to_string(),
        })
}

/// Parse `YYYY-MM-DD`, ignoring any time-of-day suffix
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parse a positive, finite price; empty and `NaN` cells yield `None`
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}
