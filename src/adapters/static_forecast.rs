//! Forecast provider backed by the `[forecast]` config section.
//!
//! ```ini
//! [forecast]
//! default = neutral
//! AAPL = up
//! ```

use crate::domain::error::{ForecastError, PricescopeError};
use crate::domain::forecast::{Forecast, ForecastProvider};
use crate::ports::config_port::ConfigPort;
use std::collections::HashMap;

pub const FORECAST_SECTION: &str = "forecast";
const DEFAULT_KEY: &str = "default";

#[derive(Debug, Clone, Default)]
pub struct StaticForecastProvider {
    by_ticker: HashMap<String, Forecast>,
    fallback: Option<Forecast>,
}

impl StaticForecastProvider {
    pub fn new(fallback: Option<Forecast>) -> Self {
        Self {
            by_ticker: HashMap::new(),
            fallback,
        }
    }

    pub fn with(mut self, ticker: &str, forecast: Forecast) -> Self {
        self.by_ticker.insert(ticker.trim().to_uppercase(), forecast);
        self
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PricescopeError> {
        let mut provider = Self::default();
        for key in config.keys(FORECAST_SECTION) {
            let Some(raw) = config.get_string(FORECAST_SECTION, &key) else {
                continue;
            };
            let forecast: Forecast =
                raw.parse()
                    .map_err(|reason| PricescopeError::ConfigInvalid {
                        section: FORECAST_SECTION.to_string(),
                        key: key.clone(),
                        reason,
                    })?;
            if key.eq_ignore_ascii_case(DEFAULT_KEY) {
                provider.fallback = Some(forecast);
            } else {
                provider.by_ticker.insert(key.to_uppercase(), forecast);
            }
        }
        Ok(provider)
    }
}

impl ForecastProvider for StaticForecastProvider {
    fn forecast(&self, ticker: &str) -> Result<Forecast, ForecastError> {
        self.by_ticker
            .get(&ticker.trim().to_uppercase())
            .copied()
            .or(self.fallback)
            .ok_or_else(|| ForecastError {
                ticker: ticker.to_string(),
                reason: "no forecast configured and no default".to_string(),
            })
    }
}
