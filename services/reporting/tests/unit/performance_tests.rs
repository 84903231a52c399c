//! Unit tests for return and risk statistics

use approx::assert_relative_eq;
use reporting::*;
use rstest::*;
use services_common::{BacktestError, MetricsConfig};

use crate::series;

#[fixture]
fn daily() -> MetricsConfig {
    MetricsConfig::default()
}

#[rstest]
fn test_constant_series_has_zero_returns(daily: MetricsConfig) {
    let values = [100.0, 100.0, 100.0];
    let returns: Vec<f64> = daily_returns(&values).collect();

    assert_eq!(returns, vec![0.0, 0.0]);
    assert_eq!(cumulative_return(&values).unwrap(), 0.0);
    assert!(matches!(
        sharpe_ratio(&returns, &daily),
        Err(BacktestError::DegenerateSeries(_))
    ));
}

#[rstest]
fn test_daily_returns_are_relative_changes() {
    let returns: Vec<f64> = daily_returns(&[100.0, 110.0, 99.0]).collect();

    assert_relative_eq!(returns[0], 0.1, epsilon = 1e-12);
    assert_relative_eq!(returns[1], -0.1, epsilon = 1e-12);
}

#[rstest]
fn test_daily_returns_can_be_replayed() {
    let values = [1.0, 2.0, 3.0, 6.0];
    let first: Vec<f64> = daily_returns(&values).collect();
    let second: Vec<f64> = daily_returns(&values).collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), values.len() - 1);
}

#[rstest]
#[case(&[100.0, 150.0], 0.5)]
#[case(&[100.0, 80.0, 120.0], 0.2)]
#[case(&[42.0], 0.0)]
fn test_cumulative_return(#[case] values: &[f64], #[case] expected: f64) {
    assert_relative_eq!(cumulative_return(values).unwrap(), expected, epsilon = 1e-12);
}

#[rstest]
fn test_cumulative_return_of_nothing_is_empty_input() {
    assert!(matches!(cumulative_return(&[]), Err(BacktestError::EmptyInput(_))));
}

#[rstest]
fn test_cumulative_return_from_zero_is_degenerate() {
    assert!(matches!(
        cumulative_return(&[0.0, 10.0]),
        Err(BacktestError::DegenerateSeries(_))
    ));
}

#[rstest]
fn test_mean_and_sample_std() {
    let returns = [0.01, -0.02, 0.03, 0.0];

    assert_relative_eq!(mean_daily_return(&returns).unwrap(), 0.005, epsilon = 1e-15);
    // squared deviations: 0.000025 + 0.000625 + 0.000625 + 0.000025 over n - 1
    let expected = (0.0013f64 / 3.0).sqrt();
    assert_relative_eq!(std_daily_return(&returns).unwrap(), expected, epsilon = 1e-12);
}

#[rstest]
fn test_mean_of_no_returns_is_empty_input() {
    assert!(matches!(mean_daily_return(&[]), Err(BacktestError::EmptyInput(_))));
}

#[rstest]
fn test_std_needs_two_returns() {
    assert!(matches!(
        std_daily_return(&[0.01]),
        Err(BacktestError::DegenerateSeries(_))
    ));
}

#[rstest]
fn test_sharpe_is_annualized(daily: MetricsConfig) {
    let returns = [0.01, -0.02, 0.03, 0.0];
    let std = (0.0013f64 / 3.0).sqrt();

    let sharpe = sharpe_ratio(&returns, &daily).unwrap();

    assert_relative_eq!(sharpe, 0.005 / std * 252f64.sqrt(), epsilon = 1e-9);
}

#[rstest]
fn test_sharpe_subtracts_per_period_risk_free_rate() {
    let returns = [0.01, -0.02, 0.03, 0.0];
    let std = (0.0013f64 / 3.0).sqrt();
    let config = MetricsConfig {
        periods_per_year: 12,
        risk_free_rate: 0.001,
    };

    let sharpe = sharpe_ratio(&returns, &config).unwrap();

    assert_relative_eq!(sharpe, 0.004 / std * 12f64.sqrt(), epsilon = 1e-9);
}

#[rstest]
fn test_max_drawdown_tracks_running_peak() {
    assert_relative_eq!(max_drawdown(&[100.0, 120.0, 90.0, 130.0, 117.0]), 0.25);
    assert_eq!(max_drawdown(&[]), 0.0);
}

#[rstest]
fn test_summary_of_value_series(daily: MetricsConfig) {
    let summary = PerformanceSummary::from_series(&series(&[100.0, 110.0, 99.0, 121.0]), &daily)
        .unwrap();

    assert_eq!(summary.trading_days, 4);
    assert_eq!(summary.start_value, 100.0);
    assert_eq!(summary.final_value, 121.0);
    assert_relative_eq!(summary.cumulative_return.unwrap(), 0.21, epsilon = 1e-12);
    assert_relative_eq!(summary.max_drawdown, 0.1, epsilon = 1e-12);
    assert!(summary.mean_daily_return.is_some());
    assert!(summary.std_daily_return.is_some());
    assert!(summary.sharpe_ratio.is_some());
}

#[rstest]
fn test_summary_of_flat_series_has_no_sharpe(daily: MetricsConfig) {
    let summary =
        PerformanceSummary::from_series(&series(&[100.0, 100.0, 100.0]), &daily).unwrap();

    assert_eq!(summary.cumulative_return, Some(0.0));
    assert_eq!(summary.mean_daily_return, Some(0.0));
    assert_eq!(summary.std_daily_return, Some(0.0));
    assert_eq!(summary.sharpe_ratio, None);
}

#[rstest]
fn test_summary_of_single_day(daily: MetricsConfig) {
    let summary = PerformanceSummary::from_series(&series(&[100.0]), &daily).unwrap();

    assert_eq!(summary.trading_days, 1);
    assert_eq!(summary.mean_daily_return, None);
    assert_eq!(summary.std_daily_return, None);
    assert_eq!(summary.sharpe_ratio, None);
}

#[rstest]
fn test_summary_from_zero_start_has_no_cumulative_return(daily: MetricsConfig) {
    let summary = PerformanceSummary::from_series(&series(&[0.0, 50.0, 60.0]), &daily).unwrap();

    assert_eq!(summary.cumulative_return, None);
    assert_eq!(summary.final_value, 60.0);
    assert_relative_eq!(summary.max_drawdown, 0.0);
}

#[rstest]
fn test_summary_of_empty_series_is_empty_input(daily: MetricsConfig) {
    let err = PerformanceSummary::from_series(&services_common::ValueSeries::default(), &daily)
        .unwrap_err();

    assert!(matches!(err, BacktestError::EmptyInput(_)));
}
