//! Watchlist of tickers to analyse.
//!
//! The list is owned by the caller and passed explicitly; nothing here is
//! global or persisted.

use crate::domain::error::PricescopeError;
use crate::domain::period::Period;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchlistError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("ticker list is empty")]
    Empty,
}

/// Splits a comma separated list into upper-cased tickers.
///
/// Duplicates are dropped, keeping the first occurrence.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, WatchlistError> {
    if input.trim().is_empty() {
        return Err(WatchlistError::Empty);
    }
    let mut watchlist = Watchlist::default();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(WatchlistError::EmptyToken);
        }
        watchlist.add(trimmed);
    }
    Ok(watchlist.tickers)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    tickers: Vec<String>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Result<Self, WatchlistError> {
        Ok(Self {
            tickers: parse_tickers(input)?,
        })
    }

    /// Adds a ticker, returning `false` when it is already present.
    pub fn add(&mut self, ticker: &str) -> bool {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() || self.contains(&ticker) {
            return false;
        }
        self.tickers.push(ticker);
        true
    }

    pub fn contains(&self, ticker: &str) -> bool {
        let ticker = ticker.trim().to_uppercase();
        self.tickers.iter().any(|t| *t == ticker)
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// Outcome of loading one watchlist entry.
#[derive(Debug)]
pub struct TickerData {
    pub ticker: String,
    pub series: Result<PriceSeries, PricescopeError>,
}

/// Loads every ticker independently. A failing ticker does not stop the
/// others; an empty series is reported as `NoData`.
pub fn load_watchlist(
    data_port: &dyn DataPort,
    watchlist: &Watchlist,
    period: Period,
) -> Vec<TickerData> {
    watchlist
        .tickers()
        .iter()
        .map(|ticker| {
            let series = data_port
                .fetch_closes(ticker, period)
                .and_then(|series| {
                    if series.is_empty() {
                        Err(PricescopeError::NoData {
                            ticker: ticker.clone(),
                        })
                    } else {
                        Ok(series)
                    }
                });
            TickerData {
                ticker: ticker.clone(),
                series,
            }
        })
        .collect()
}
