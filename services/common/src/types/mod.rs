//! Core domain types for the market simulator

pub mod market;
pub mod order;
pub mod series;

// Re-export all types
pub use market::*;
pub use order::*;
pub use series::*;
