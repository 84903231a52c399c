//! Property-based tests over the metric functions

pub mod property_tests;
