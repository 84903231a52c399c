//! Unit tests for the fund versus benchmark report

use pretty_assertions::assert_eq;
use reporting::*;
use rstest::*;
use services_common::{BacktestError, MetricsConfig};

use crate::series;

#[fixture]
fn report() -> ComparisonReport {
    ComparisonReport::build(
        &series(&[1_000_000.0, 1_010_000.0, 1_005_000.0, 1_030_000.0]),
        "$SPX",
        &series(&[1_270.0, 1_275.0, 1_275.0, 1_280.0]),
        &MetricsConfig::default(),
    )
    .unwrap()
}

#[rstest]
fn test_report_summarizes_both_series(report: ComparisonReport) {
    assert_eq!(report.benchmark_symbol, "$SPX");
    assert_eq!(report.fund.trading_days, 4);
    assert_eq!(report.benchmark.trading_days, 4);
    assert_eq!(report.fund.final_value, 1_030_000.0);
    assert_eq!(report.benchmark.start_date, report.fund.start_date);
}

#[rstest]
fn test_report_text_layout(report: ComparisonReport) {
    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("--- begin statistics"));
    assert_eq!(lines[1], "Date Range: 2011-01-01 to 2011-01-04 (portfolio)");
    assert_eq!(lines[2], "Number of Trading Days:                          4");
    assert!(lines[3].starts_with("Sharpe Ratio of Fund:"));
    assert!(lines[4].starts_with("Sharpe Ratio of $SPX"));
    assert_eq!(lines[5], "Cumulative Return of Fund:          +0.03000000000");
    assert_eq!(lines.last().copied(), Some("Final Portfolio Value:        +1030000.00000000000"));
}

#[rstest]
fn test_undefined_statistics_are_labelled() {
    let flat = series(&[100.0, 100.0, 100.0]);
    let report = ComparisonReport::build(&flat, "IDX", &flat, &MetricsConfig::default()).unwrap();

    let text = report.to_string();

    assert!(text.contains("Sharpe Ratio of Fund:               undefined"));
    assert!(text.contains("Standard Deviation of Fund:         +0.00000000000"));
}

#[rstest]
fn test_report_serializes_to_json(report: ComparisonReport) {
    let json = serde_json::to_string(&report).unwrap();
    let parsed: ComparisonReport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.benchmark_symbol, report.benchmark_symbol);
    assert_eq!(parsed.fund.trading_days, report.fund.trading_days);
    assert_eq!(parsed.fund.start_date, report.fund.start_date);
}

#[rstest]
fn test_misaligned_series_rejected() {
    let err = ComparisonReport::build(
        &series(&[1.0, 2.0, 3.0]),
        "IDX",
        &series(&[1.0, 2.0]),
        &MetricsConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, BacktestError::InvalidPriceTable(_)));
}

/// Offset where the value starts on a "<label>: <value>" line
fn value_column(line: &str) -> usize {
    let after_label = line.rfind(':').unwrap() + 1;
    let rest = &line[after_label..];
    after_label + rest.len() - rest.trim_start().len()
}

#[rstest]
fn test_benchmark_labels_end_with_colon(report: ComparisonReport) {
    let text = report.to_string();

    assert!(text.contains("Sharpe Ratio of $SPX:"));
    assert!(text.contains("Max Drawdown of $SPX:"));
}

#[rstest]
fn test_long_benchmark_name_keeps_columns_aligned() {
    let report = ComparisonReport::build(
        &series(&[100.0, 101.0, 103.0]),
        "MSCI_WORLD_TOTAL_RETURN_INDEX",
        &series(&[50.0, 49.0, 52.0]),
        &MetricsConfig::default(),
    )
    .unwrap();

    let text = report.to_string();
    let stat_lines: Vec<&str> = text.lines().skip(3).take(10).collect();
    let columns: Vec<usize> = stat_lines.iter().map(|line| value_column(line)).collect();

    assert!(stat_lines[1].starts_with("Sharpe Ratio of MSCI_WORLD_TOTAL_RETURN_INDEX: "));
    assert!(columns.iter().all(|column| *column == columns[0]), "columns: {columns:?}");
}

#[rstest]
fn test_zero_start_value_reports_undefined_return() {
    let report = ComparisonReport::build(
        &series(&[0.0, 10.0, 12.0]),
        "IDX",
        &series(&[100.0, 101.0, 102.0]),
        &MetricsConfig::default(),
    )
    .unwrap();

    assert_eq!(report.fund.cumulative_return, None);
    assert!(report.to_string().contains("Cumulative Return of Fund:          undefined"));
}
