//! Dated value series and calendar ranges

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::order::Order;
use crate::errors::{BacktestError, BacktestResult};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> BacktestResult<Self> {
        if start > end {
            return Err(BacktestError::InvalidConfig(format!(
                "date range starts {start} after it ends {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Smallest range covering every order date
    pub fn spanning(orders: &[Order]) -> BacktestResult<Self> {
        let start = orders.iter().map(|order| order.date).min();
        let end = orders.iter().map(|order| order.date).max();
        match start.zip(end) {
            Some((start, end)) => Ok(Self { start, end }),
            None => Err(BacktestError::EmptyInput(
                "cannot derive a date range from an empty order list".to_string(),
            )),
        }
    }

    /// True when `date` falls inside the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Ordered `(date, value)` observations
///
/// Dates are strictly ascending. Once built the series is read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl ValueSeries {
    /// Build a series from points, checking date order
    pub fn from_points(points: Vec<(NaiveDate, f64)>) -> BacktestResult<Self> {
        if let Some(pair) = points.windows(2).find(|pair| pair[0].0 >= pair[1].0) {
            return Err(BacktestError::InvalidPriceTable(format!(
                "series dates must be strictly ascending, found {} before {}",
                pair[0].0, pair[1].0
            )));
        }
        Ok(Self { points })
    }

    /// Start an empty series sized for `capacity` points
    #[must_use]
    pub fn with_capacity(capacity: usize) -> SeriesBuilder {
        SeriesBuilder {
            points: Vec::with_capacity(capacity),
        }
    }

    /// All observations
    #[must_use]
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    /// Observation dates in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(date, _)| *date)
    }

    /// Observed values in date order
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest observation
    #[must_use]
    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.points.first().copied()
    }

    /// Latest observation
    #[must_use]
    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.last().copied()
    }
}

/// Append-only accumulator that seals into a [`ValueSeries`]
#[derive(Debug)]
pub struct SeriesBuilder {
    points: Vec<(NaiveDate, f64)>,
}

impl SeriesBuilder {
    /// Append the next observation; dates must keep increasing
    pub fn push(&mut self, date: NaiveDate, value: f64) -> BacktestResult<()> {
        if let Some((last, _)) = self.points.last() {
            if *last >= date {
                return Err(BacktestError::InvalidPriceTable(format!(
                    "observation for {date} arrived after {last}"
                )));
            }
        }
        self.points.push((date, value));
        Ok(())
    }

    /// Finish the series
    #[must_use]
    pub fn finish(self) -> ValueSeries {
        ValueSeries {
            points: self.points,
        }
    }
}
