//! Benchmark alignment
//!
//! The benchmark index trades on its own calendar. To compare it with a
//! simulated fund it is reindexed onto the fund's dates: a fund date takes the
//! index level printed that day, or else the level already aligned on the
//! previous fund date. Prints on days the fund does not trade are ignored. The
//! fund's own price table never goes through this path; it stays a strict
//! intersection.

use chrono::NaiveDate;
use services_common::{BacktestError, BacktestResult, PriceHistory, Symbol, ValueSeries};
use tracing::debug;

/// Reindex `benchmark` onto `dates`, forward-filling over the fund's dates
///
/// The first date has no aligned predecessor, so it is seeded with the latest
/// level at or before it. A first date that precedes every observation is
/// [`BacktestError::MissingPrice`].
pub fn align_to_dates<I>(
    symbol: &Symbol,
    benchmark: &PriceHistory,
    dates: I,
) -> BacktestResult<ValueSeries>
where
    I: IntoIterator<Item = NaiveDate>,
{
    if benchmark.is_empty() {
        return Err(BacktestError::EmptyInput(format!(
            "benchmark {symbol} has no observations"
        )));
    }

    let dates = dates.into_iter();
    let mut aligned = ValueSeries::with_capacity(dates.size_hint().0);
    let mut previous: Option<f64> = None;
    let mut carried = 0usize;

    for date in dates {
        let level = match (benchmark.get(&date), previous) {
            (Some(level), _) => *level,
            (None, Some(level)) => {
                carried += 1;
                level
            }
            (None, None) => {
                let (_, level) = benchmark.range(..=date).next_back().ok_or_else(|| {
                    BacktestError::MissingPrice {
                        symbol: symbol.clone(),
                        date,
                    }
                })?;
                carried += 1;
                *level
            }
        };
        aligned.push(date, level)?;
        previous = Some(level);
    }

    if carried > 0 {
        debug!("Benchmark {symbol}: carried {carried} levels forward onto fund dates");
    }

    Ok(aligned.finish())
}
