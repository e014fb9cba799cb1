//! pricescope: price history analytics.
//!
//! Technical indicators, crossover signals and backtests, risk metrics,
//! price range projections and a composite score for a watchlist of tickers.
//!
//! Hexagonal architecture: pure analytics in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`], command line in
//! [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
