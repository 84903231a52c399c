//! Order sources
//!
//! Orders are read as `Date,Symbol,Order,Shares` CSV records and returned in
//! file order, which is the order same-day orders are applied in.

use serde::Deserialize;
use services_common::{BacktestError, Order};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{DataError, DataResult};
use crate::market_data::parse_date;

/// Supplier of an ordered list of orders
pub trait OrderSource {
    fn orders(&self) -> DataResult<Vec<Order>>;
}

impl OrderSource for Vec<Order> {
    fn orders(&self) -> DataResult<Vec<Order>> {
        Ok(self.clone())
    }
}

/// Orders stored in a CSV file
#[derive(Debug, Clone)]
pub struct CsvOrderFile {
    path: PathBuf,
}

impl CsvOrderFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every order in the file at `path`
    pub fn load(path: impl Into<PathBuf>) -> DataResult<Vec<Order>> {
        Self::new(path).orders()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderSource for CsvOrderFile {
    fn orders(&self) -> DataResult<Vec<Order>> {
        let file = File::open(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        let orders = read_orders_from(file, &self.path.display().to_string())?;
        info!("Loaded {} orders from {}", orders.len(), self.path.display());
        Ok(orders)
    }
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Order")]
    action: String,
    #[serde(rename = "Shares")]
    shares: i64,
}

/// Parse orders from CSV text with a `Date,Symbol,Order,Shares` header
pub fn read_orders<R: Read>(reader: R) -> DataResult<Vec<Order>> {
    read_orders_from(reader, "orders")
}

fn read_orders_from<R: Read>(reader: R, origin: &str) -> DataResult<Vec<Order>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut orders = Vec::new();

    for (line, result) in reader.deserialize::<OrderRecord>().enumerate() {
        // header is line 1
        let location = format!("{origin} line {}", line + 2);
        let record = result.map_err(|source| DataError::Csv {
            location: location.clone(),
            source,
        })?;

        let date = parse_date(&record.date).ok_or_else(|| DataError::Parse {
            location: location.clone(),
            message: format!("invalid date '{}'", record.date),
        })?;

        let order = Order::parse(date, &record.symbol, &record.action, record.shares)
            .map_err(|err| match err {
                BacktestError::InvalidOrder(reason) => {
                    BacktestError::InvalidOrder(format!("{location}: {reason}"))
                }
                other => other,
            })?;
        orders.push(order);
    }

    Ok(orders)
}
