//! Core domain types and logic.

pub mod price;
pub mod signal;
pub mod portfolio;
pub mod execution;
pub mod indicator;
pub mod backtest;
pub mod batch;
pub mod metrics;
pub mod strategy;
pub mod validation;
pub mod config_validation;
pub mod universe;
pub mod error;
