//! Price history access port.

use crate::domain::error::PricescopeError;
use crate::domain::period::Period;
use crate::domain::price_series::PriceSeries;

pub trait DataPort {
    /// Closing prices for `ticker` over the lookback `period`, ending at
    /// the latest available observation.
    fn fetch_closes(&self, ticker: &str, period: Period) -> Result<PriceSeries, PricescopeError>;

    fn list_tickers(&self) -> Result<Vec<String>, PricescopeError>;
}
