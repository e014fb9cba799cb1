//! Forecast direction capability and the SMA price projection.
//!
//! The analytics core does not predict direction itself. A
//! [`ForecastProvider`] is injected by the caller and its answer is taken
//! as an input to scoring.

use crate::domain::error::{AnalysisError, ForecastError};
use crate::domain::indicator::calculate_sma;
use crate::domain::price_series::{PricePoint, PriceSeries};
use chrono::Days;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Forecast {
    Up,
    Down,
    Neutral,
}

impl Forecast {
    /// Contribution to the composite score.
    pub fn points(self) -> i32 {
        match self {
            Forecast::Up => 1,
            Forecast::Down => -1,
            Forecast::Neutral => 0,
        }
    }
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Forecast::Up => write!(f, "up"),
            Forecast::Down => write!(f, "down"),
            Forecast::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for Forecast {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Forecast::Up),
            "down" => Ok(Forecast::Down),
            "neutral" => Ok(Forecast::Neutral),
            other => Err(format!(
                "unknown forecast '{}', expected up, down or neutral",
                other
            )),
        }
    }
}

/// Supplies a forecast direction for a ticker.
pub trait ForecastProvider: Send + Sync {
    fn forecast(&self, ticker: &str) -> Result<Forecast, ForecastError>;
}

/// Provider that answers the same direction for every ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedForecast(pub Forecast);

impl ForecastProvider for FixedForecast {
    fn forecast(&self, _ticker: &str) -> Result<Forecast, ForecastError> {
        Ok(self.0)
    }
}

pub const DEFAULT_PROJECTION_WINDOW: usize = 5;

/// Flat projection of the latest SMA value over the next `horizon_days`
/// calendar days.
pub fn project_sma(
    series: &PriceSeries,
    horizon_days: u32,
    window: usize,
) -> Result<Vec<PricePoint>, AnalysisError> {
    if horizon_days == 0 {
        return Err(AnalysisError::invalid("horizon_days", "must be positive"));
    }
    if window == 0 {
        return Err(AnalysisError::invalid("window", "must be positive"));
    }
    let last_date = series.last().ok_or(AnalysisError::EmptySeries)?.date;

    let sma = calculate_sma(&series.closes(), window);
    let level = sma.latest().ok_or_else(|| AnalysisError::InsufficientData {
        indicator: sma.indicator_type.to_string(),
        required: window,
        available: series.len(),
    })?;

    Ok((1..=u64::from(horizon_days))
        .filter_map(|d| last_date.checked_add_days(Days::new(d)))
        .map(|date| PricePoint::new(date, level))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes)
    }

    #[test]
    fn forecast_points() {
        assert_eq!(Forecast::Up.points(), 1);
        assert_eq!(Forecast::Down.points(), -1);
        assert_eq!(Forecast::Neutral.points(), 0);
    }

    #[test]
    fn forecast_parse_round_trip() {
        for f in [Forecast::Up, Forecast::Down, Forecast::Neutral] {
            assert_eq!(f.to_string().parse::<Forecast>().unwrap(), f);
        }
        assert_eq!(" UP ".parse::<Forecast>().unwrap(), Forecast::Up);
        assert!("sideways".parse::<Forecast>().is_err());
    }

    #[test]
    fn fixed_provider_ignores_ticker() {
        let p = FixedForecast(Forecast::Down);
        assert_eq!(p.forecast("AAPL").unwrap(), Forecast::Down);
        assert_eq!(p.forecast("BTC-USD").unwrap(), Forecast::Down);
    }

    #[test]
    fn projection_holds_last_sma() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let projection = project_sma(&s, 3, 5).unwrap();
        assert_eq!(projection.len(), 3);
        for p in &projection {
            assert_eq!(p.close, 4.0);
        }
        assert_eq!(projection[0].date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(projection[2].date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn projection_needs_full_window() {
        let err = project_sma(&series(&[1.0, 2.0]), 3, 5).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { required: 5, available: 2, .. }));
    }

    #[test]
    fn projection_rejects_bad_parameters() {
        let s = series(&[1.0; 10]);
        assert!(project_sma(&s, 0, 5).is_err());
        assert!(project_sma(&s, 5, 0).is_err());
        assert_eq!(
            project_sma(&PriceSeries::default(), 5, 5).unwrap_err(),
            AnalysisError::EmptySeries
        );
    }
}
