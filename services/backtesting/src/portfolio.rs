//! Cash and share holdings for one simulation run

use rustc_hash::FxHashMap;
use services_common::{BacktestError, BacktestResult, OrderAction, SimulationConfig, Symbol};
use tracing::warn;

/// Cash balance and signed share counts of the simulated portfolio
///
/// Created by the simulator at the start of a run with zero holdings for every
/// traded symbol and dropped once the value series is complete. Cash and
/// holdings may go negative (margin and short positions).
#[derive(Debug, Clone)]
pub struct PortfolioState {
    cash: f64,
    symbols: Vec<Symbol>,
    holdings: Vec<i64>,
    slots: FxHashMap<Symbol, usize>,
    warned_margin: bool,
    warned_short: bool,
}

impl PortfolioState {
    /// Start with `cash` and a flat position in each of `symbols`
    pub(crate) fn new(cash: f64, symbols: Vec<Symbol>) -> Self {
        let slots = symbols
            .iter()
            .enumerate()
            .map(|(slot, symbol)| (symbol.clone(), slot))
            .collect();
        let holdings = vec![0; symbols.len()];

        Self {
            cash,
            symbols,
            holdings,
            slots,
            warned_margin: false,
            warned_short: false,
        }
    }

    /// Current cash balance
    #[must_use]
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Shares held in `symbol`; zero for symbols never traded
    #[must_use]
    pub fn holding(&self, symbol: &Symbol) -> i64 {
        self.slot(symbol).map_or(0, |slot| self.holdings[slot])
    }

    /// Every tracked symbol with its share count, in first-traded order
    pub fn holdings(&self) -> impl Iterator<Item = (&Symbol, i64)> + '_ {
        self.symbols.iter().zip(self.holdings.iter().copied())
    }

    /// Tracked symbols in first-traded order
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub(crate) fn slot(&self, symbol: &Symbol) -> Option<usize> {
        self.slots.get(symbol).copied()
    }

    /// Execute a fill at `price`, charging impact and commission
    ///
    /// A fill that would push the share count past `i64` range is refused
    /// with [`BacktestError::InvalidOrder`] and leaves the state untouched.
    pub(crate) fn apply_fill(
        &mut self,
        slot: usize,
        action: OrderAction,
        shares: i64,
        price: f64,
        costs: &SimulationConfig,
    ) -> BacktestResult<()> {
        let held = self.holdings[slot];
        let updated = match action {
            OrderAction::Buy => held.checked_add(shares),
            OrderAction::Sell => held.checked_sub(shares),
        }
        .ok_or_else(|| {
            BacktestError::InvalidOrder(format!(
                "{action} {shares} {} overflows a position of {held} shares",
                self.symbols[slot]
            ))
        })?;

        let notional = price * shares as f64;
        match action {
            OrderAction::Buy => self.cash -= notional * (1.0 + costs.impact) + costs.commission,
            OrderAction::Sell => self.cash += notional * (1.0 - costs.impact) - costs.commission,
        }
        self.holdings[slot] = updated;

        if self.cash < 0.0 && !self.warned_margin {
            self.warned_margin = true;
            warn!("Cash balance went negative ({:.2}); continuing on margin", self.cash);
        }
        if self.holdings[slot] < 0 && !self.warned_short {
            self.warned_short = true;
            warn!(
                "Position in {} went short ({} shares)",
                self.symbols[slot], self.holdings[slot]
            );
        }
        Ok(())
    }

    /// Cash plus holdings marked at the prices returned by `price_of`
    pub(crate) fn mark_to_market(&self, mut price_of: impl FnMut(usize) -> f64) -> f64 {
        let stock_value: f64 = self
            .holdings
            .iter()
            .enumerate()
            .map(|(slot, shares)| *shares as f64 * price_of(slot))
            .sum();
        self.cash + stock_value
    }
}
