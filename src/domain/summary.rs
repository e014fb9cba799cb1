//! Price overview: range of closes and long-horizon trend.

use crate::domain::error::AnalysisError;
use crate::domain::indicator::moving_averages;
use crate::domain::price_series::PriceSeries;
use std::fmt;

pub const TREND_SHORT_WINDOW: usize = 50;
pub const TREND_LONG_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Trend {
    Bullish,
    Bearish,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "Bullish"),
            Trend::Bearish => write!(f, "Bearish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceSummary {
    pub min_close: f64,
    pub max_close: f64,
    pub last_close: f64,
    /// `None` until the long average has enough history.
    pub trend: Option<Trend>,
}

pub fn summarize(series: &PriceSeries) -> Result<PriceSummary, AnalysisError> {
    summarize_with(series, TREND_SHORT_WINDOW, TREND_LONG_WINDOW)
}

pub fn summarize_with(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<PriceSummary, AnalysisError> {
    let last_close = series.last().ok_or(AnalysisError::EmptySeries)?.close;
    let closes = series.closes();
    let min_close = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max_close = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (short, long) = moving_averages(&closes, short_window, long_window);
    let trend = match (short.latest(), long.latest()) {
        (Some(s), Some(l)) if s > l => Some(Trend::Bullish),
        (Some(_), Some(_)) => Some(Trend::Bearish),
        _ => None,
    };

    Ok(PriceSummary {
        min_close,
        max_close,
        last_close,
        trend,
    })
}
