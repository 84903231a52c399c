//! Property-based tests for return statistics
//!
//! - Cumulative return equals the compounded daily returns
//! - One fewer return than values
//! - Drawdown is a fraction in [0, 1) for positive series

use proptest::prelude::*;
use reporting::*;
use services_common::{BacktestError, MetricsConfig};

/// Positive portfolio values
fn arb_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..10_000.0, 1..100)
}

proptest! {
    #[test]
    fn prop_cumulative_matches_compounded_returns(values in arb_values()) {
        let compounded = daily_returns(&values).fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;
        let cumulative = cumulative_return(&values).unwrap();

        prop_assert!((cumulative - compounded).abs() <= 1e-9 * cumulative.abs().max(1.0));
    }

    #[test]
    fn prop_one_return_per_step(values in arb_values()) {
        let returns = daily_returns(&values);

        prop_assert_eq!(returns.len(), values.len() - 1);
        prop_assert!(returns.clone().all(f64::is_finite));
    }

    #[test]
    fn prop_drawdown_is_a_fraction(values in arb_values()) {
        let drawdown = max_drawdown(&values);

        prop_assert!((0.0..1.0).contains(&drawdown));
    }

    #[test]
    fn prop_constant_returns_have_no_sharpe(r in -0.05f64..0.05, n in 2usize..50) {
        let returns = vec![r; n];

        let result = sharpe_ratio(&returns, &MetricsConfig::default());

        prop_assert!(matches!(result, Err(BacktestError::DegenerateSeries(_))));
    }
}
