//! Unit tests for benchmark alignment

use reporting::*;
use rstest::*;
use services_common::{BacktestError, PriceHistory, Symbol};

use crate::day;

#[fixture]
fn spx() -> PriceHistory {
    // no print on days 3 and 4
    [
        (day(1), 1_270.0),
        (day(2), 1_275.0),
        (day(5), 1_280.0),
        (day(6), 1_290.0),
    ]
    .into()
}

#[rstest]
fn test_gaps_take_latest_prior_level(spx: PriceHistory) {
    let aligned = align_to_dates(&Symbol::new("$SPX"), &spx, (2..=6).map(day)).unwrap();

    assert_eq!(aligned.values(), vec![1_275.0, 1_275.0, 1_275.0, 1_280.0, 1_290.0]);
    assert!(aligned.dates().eq((2..=6).map(day)));
}

#[rstest]
fn test_dates_after_history_carry_last_level(spx: PriceHistory) {
    let aligned = align_to_dates(&Symbol::new("$SPX"), &spx, [day(6), day(9)]).unwrap();

    assert_eq!(aligned.values(), vec![1_290.0, 1_290.0]);
}

#[rstest]
fn test_leading_gap_is_missing_price(spx: PriceHistory) {
    let err = align_to_dates(&Symbol::new("$SPX"), &spx, [day(0), day(1)]).unwrap_err();

    assert_eq!(
        err,
        BacktestError::MissingPrice {
            symbol: Symbol::new("$SPX"),
            date: day(0),
        }
    );
}

#[rstest]
fn test_empty_history_is_empty_input() {
    let err = align_to_dates(&Symbol::new("$SPX"), &PriceHistory::new(), [day(0)]).unwrap_err();

    assert!(matches!(err, BacktestError::EmptyInput(_)));
}

#[rstest]
fn test_no_target_dates_gives_empty_series(spx: PriceHistory) {
    let aligned = align_to_dates(&Symbol::new("$SPX"), &spx, std::iter::empty()).unwrap();

    assert!(aligned.is_empty());
}

#[rstest]
fn test_unsorted_target_dates_rejected(spx: PriceHistory) {
    let err = align_to_dates(&Symbol::new("$SPX"), &spx, [day(5), day(2)]).unwrap_err();

    assert!(matches!(err, BacktestError::InvalidPriceTable(_)));
}

#[rstest]
fn test_prints_between_fund_dates_are_ignored() {
    let history: PriceHistory = [(day(1), 100.0), (day(2), 200.0)].into();

    let aligned = align_to_dates(&Symbol::new("$SPX"), &history, [day(1), day(3)]).unwrap();

    // day 3 carries the day 1 level, not the day 2 print the fund never saw
    assert_eq!(aligned.values(), vec![100.0, 100.0]);
}

#[rstest]
fn test_first_date_seeded_from_earlier_print() {
    let history: PriceHistory = [(day(0), 90.0), (day(2), 95.0), (day(3), 99.0)].into();

    let aligned =
        align_to_dates(&Symbol::new("$SPX"), &history, [day(1), day(3), day(4)]).unwrap();

    assert_eq!(aligned.values(), vec![90.0, 99.0, 99.0]);
}
