//! Reporting Service
//!
//! Performance statistics for simulated portfolios and the benchmark
//! comparison built on top of them

pub mod benchmark;
pub mod performance;
pub mod report;

pub use benchmark::align_to_dates;
pub use performance::{
    DailyReturns, PerformanceSummary, cumulative_return, daily_returns, max_drawdown,
    mean_daily_return, sharpe_ratio, std_daily_return,
};
pub use report::ComparisonReport;
