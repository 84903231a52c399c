//! Portfolio valuation simulator
//!
//! Walks the price table date by date, applies the orders scheduled for each
//! date in their original order, and records cash plus marked-to-market
//! holdings. Orders fill at the same day's price and the day's value reflects
//! the state after those fills.

use services_common::{
    BacktestError, BacktestResult, Order, PriceTable, SimulationConfig, Symbol, ValueSeries,
};
use tracing::{debug, info};

use crate::admission::{AdmitAll, OrderAdmission};
use crate::portfolio::PortfolioState;

/// An order resolved against the price table before the run starts
#[derive(Debug, Clone, Copy)]
struct ScheduledOrder<'a> {
    order: &'a Order,
    column: usize,
    slot: usize,
}

/// Replays an order list over a price table
#[derive(Debug, Clone)]
pub struct PortfolioSimulator<A = AdmitAll> {
    config: SimulationConfig,
    admission: A,
}

impl PortfolioSimulator<AdmitAll> {
    /// Simulator that admits every order
    pub fn new(config: SimulationConfig) -> BacktestResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            admission: AdmitAll,
        })
    }
}

impl<A: OrderAdmission> PortfolioSimulator<A> {
    /// Replace the admissibility policy
    pub fn with_admission<B: OrderAdmission>(self, admission: B) -> PortfolioSimulator<B> {
        PortfolioSimulator {
            config: self.config,
            admission,
        }
    }

    /// Cost model in use
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Produce one portfolio value per price table date
    ///
    /// Every order is checked up front, so a failure never leaves a partially
    /// built series behind.
    pub fn simulate(&self, orders: &[Order], prices: &PriceTable) -> BacktestResult<ValueSeries> {
        if prices.is_empty() {
            return Err(BacktestError::EmptyInput(
                "price table has no dates".to_string(),
            ));
        }
        if orders.is_empty() {
            return Err(BacktestError::EmptyInput("order list is empty".to_string()));
        }

        let (schedule, mut state, columns) = self.schedule(orders, prices)?;

        info!(
            "Simulating {} orders in {} symbols over {} dates ({} to {})",
            orders.len(),
            state.symbols().len(),
            prices.len(),
            prices.dates()[0],
            prices.dates()[prices.len() - 1]
        );

        let mut series = ValueSeries::with_capacity(prices.len());

        for (row, date) in prices.dates().iter().enumerate() {
            for scheduled in &schedule[row] {
                let order = scheduled.order;
                let price = self.price_at(prices, row, scheduled.column, order)?;

                self.admission
                    .admit(order, price, &state)
                    .map_err(|reason| BacktestError::OrderRejected {
                        date: order.date,
                        symbol: order.symbol.clone(),
                        reason,
                    })?;

                state.apply_fill(scheduled.slot, order.action, order.shares, price, &self.config)?;

                debug!(
                    "Filled {} @ {:.4} - cash: {:.2}, holding: {}",
                    order,
                    price,
                    state.cash(),
                    state.holding(&order.symbol)
                );
            }

            let mut missing = None;
            let value = state.mark_to_market(|slot| {
                prices.price_at(row, columns[slot]).unwrap_or_else(|| {
                    missing = Some(slot);
                    f64::NAN
                })
            });
            if let Some(slot) = missing {
                return Err(BacktestError::MissingPrice {
                    symbol: state.symbols()[slot].clone(),
                    date: *date,
                });
            }

            series.push(*date, value)?;
        }

        let series = series.finish();
        if let Some((date, value)) = series.last() {
            info!(
                "Simulation complete - final value on {}: {:.2} (cash {:.2})",
                date,
                value,
                state.cash()
            );
        }

        Ok(series)
    }

    /// Validate orders and bucket them by table row, keeping source order within a row
    fn schedule<'a>(
        &self,
        orders: &'a [Order],
        prices: &PriceTable,
    ) -> BacktestResult<(Vec<Vec<ScheduledOrder<'a>>>, PortfolioState, Vec<usize>)> {
        let mut tracked: Vec<Symbol> = Vec::new();
        let mut columns: Vec<usize> = Vec::new();
        let mut schedule: Vec<Vec<ScheduledOrder<'a>>> = vec![Vec::new(); prices.len()];

        for order in orders {
            order.validate()?;

            let missing = || BacktestError::MissingPrice {
                symbol: order.symbol.clone(),
                date: order.date,
            };
            let row = prices.row_of(order.date).ok_or_else(missing)?;
            let column = prices.column_of(&order.symbol).ok_or_else(missing)?;

            let slot = match tracked.iter().position(|symbol| *symbol == order.symbol) {
                Some(slot) => slot,
                None => {
                    tracked.push(order.symbol.clone());
                    columns.push(column);
                    tracked.len() - 1
                }
            };

            schedule[row].push(ScheduledOrder {
                order,
                column,
                slot,
            });
        }

        let state = PortfolioState::new(self.config.initial_cash, tracked);
        Ok((schedule, state, columns))
    }

    fn price_at(
        &self,
        prices: &PriceTable,
        row: usize,
        column: usize,
        order: &Order,
    ) -> BacktestResult<f64> {
        prices
            .price_at(row, column)
            .ok_or_else(|| BacktestError::MissingPrice {
                symbol: order.symbol.clone(),
                date: order.date,
            })
    }
}

/// Simulate with the default admit-all policy
pub fn simulate(
    orders: &[Order],
    prices: &PriceTable,
    config: &SimulationConfig,
) -> BacktestResult<ValueSeries> {
    PortfolioSimulator::new(config.clone())?.simulate(orders, prices)
}
