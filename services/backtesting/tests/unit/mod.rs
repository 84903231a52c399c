//! Unit tests for backtesting service components
