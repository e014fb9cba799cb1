//! Core analytics: pure functions over price series.

pub mod backtest;
pub mod config;
pub mod config_validation;
pub mod error;
pub mod forecast;
pub mod indicator;
pub mod period;
pub mod price_series;
pub mod range;
pub mod risk;
pub mod score;
pub mod signal;
pub mod stats;
pub mod summary;
pub mod universe;
