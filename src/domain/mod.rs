//! Core domain types and logic.

pub mod price_series;
pub mod price_generator;
pub mod indicator;
pub mod indicator_helpers;
pub mod stock_data;
pub mod strategy;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
