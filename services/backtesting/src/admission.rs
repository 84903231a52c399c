//! Order admissibility policies
//!
//! The simulator consults a policy before every fill. The default admits
//! everything, which leaves cash and holdings free to go negative.

use services_common::Order;

use crate::portfolio::PortfolioState;

/// Decides whether an order may be applied to the current portfolio
pub trait OrderAdmission {
    /// `Err(reason)` refuses the order and aborts the run
    fn admit(&self, order: &Order, fill_price: f64, portfolio: &PortfolioState) -> Result<(), String>;
}

/// Policy that accepts every order
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmitAll;

impl OrderAdmission for AdmitAll {
    fn admit(&self, _order: &Order, _fill_price: f64, _portfolio: &PortfolioState) -> Result<(), String> {
        Ok(())
    }
}

impl<F> OrderAdmission for F
where
    F: Fn(&Order, f64, &PortfolioState) -> Result<(), String>,
{
    fn admit(&self, order: &Order, fill_price: f64, portfolio: &PortfolioState) -> Result<(), String> {
        self(order, fill_price, portfolio)
    }
}
