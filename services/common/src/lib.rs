//! Shared domain types, errors and configuration for the simulation services

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

pub use crate::config::{AppConfig, DataConfig, MetricsConfig, SimulationConfig};
pub use errors::*;
pub use types::*;
