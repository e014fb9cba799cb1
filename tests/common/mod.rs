#![allow(dead_code)]

use chrono::NaiveDate;
use pricescope::domain::error::PricescopeError;
use pricescope::domain::period::Period;
pub use pricescope::domain::price_series::{PricePoint, PriceSeries};
use pricescope::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, Period)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, ticker: &str, series: PriceSeries) -> Self {
        self.data.insert(ticker.to_string(), series);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(&self, ticker: &str, period: Period) -> Result<PriceSeries, PricescopeError> {
        self.requests
            .borrow_mut()
            .push((ticker.to_string(), period));
        if let Some(reason) = self.errors.get(ticker) {
            return Err(PricescopeError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, PricescopeError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes(date(2020, 1, 1), closes)
}

pub fn constant_series(count: usize, price: f64) -> PriceSeries {
    series(&vec![price; count])
}

/// `start * (1 + rate)^i` for `i` in `0..count`.
pub fn geometric_series(count: usize, start: f64, rate: f64) -> PriceSeries {
    let closes: Vec<f64> = (0..count)
        .map(|i| start * (1.0 + rate).powi(i as i32))
        .collect();
    series(&closes)
}

pub fn linear_series(count: usize, start: f64, step: f64) -> PriceSeries {
    let closes: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
    series(&closes)
}
