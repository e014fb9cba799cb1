//! Risk metrics: annualized volatility and maximum drawdown.

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PriceSeries;
use crate::domain::stats::sample_std_dev;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskMetrics {
    pub annualized_volatility: f64,
    /// Largest peak-to-trough decline as a non-positive fraction.
    pub max_drawdown: f64,
}

impl RiskMetrics {
    pub fn compute(series: &PriceSeries) -> Result<Self, AnalysisError> {
        Ok(Self {
            annualized_volatility: annualized_volatility(series)?,
            max_drawdown: max_drawdown(series)?,
        })
    }
}

/// Sample standard deviation of simple returns scaled by √252.
pub fn annualized_volatility(series: &PriceSeries) -> Result<f64, AnalysisError> {
    annualized_volatility_with(series, TRADING_DAYS_PER_YEAR)
}

pub fn annualized_volatility_with(
    series: &PriceSeries,
    trading_days_per_year: f64,
) -> Result<f64, AnalysisError> {
    require_returns(series, "annualized_volatility")?;
    if trading_days_per_year.is_nan() || trading_days_per_year <= 0.0 {
        return Err(AnalysisError::invalid(
            "trading_days_per_year",
            "must be positive",
        ));
    }
    let stdev = sample_std_dev(&series.pct_change())
        .ok_or_else(|| insufficient("annualized_volatility", series.len()))?;
    Ok(stdev * trading_days_per_year.sqrt())
}

/// Drawdown of the cumulative-return curve at every observation.
///
/// The first observation has no prior return and sits at 0.0.
pub fn drawdown_series(series: &PriceSeries) -> Result<Vec<f64>, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let mut cumulative = 1.0;
    let mut peak = f64::NEG_INFINITY;
    Ok(series
        .pct_change()
        .into_iter()
        .map(|r| {
            cumulative *= 1.0 + r.unwrap_or(0.0);
            peak = peak.max(cumulative);
            (cumulative - peak) / peak
        })
        .collect())
}

/// Minimum of [`drawdown_series`]; 0.0 when prices never decline.
pub fn max_drawdown(series: &PriceSeries) -> Result<f64, AnalysisError> {
    let drawdowns = drawdown_series(series)?;
    Ok(drawdowns.into_iter().fold(0.0, f64::min))
}

/// A sample standard deviation needs two returns, so three observations.
pub(crate) const MIN_OBSERVATIONS_FOR_VOLATILITY: usize = 3;

pub(crate) fn insufficient(what: &str, available: usize) -> AnalysisError {
    AnalysisError::InsufficientData {
        indicator: what.to_string(),
        required: MIN_OBSERVATIONS_FOR_VOLATILITY,
        available,
    }
}

fn require_returns(series: &PriceSeries, what: &str) -> Result<(), AnalysisError> {
    match series.len() {
        0 => Err(AnalysisError::EmptySeries),
        n if n < MIN_OBSERVATIONS_FOR_VOLATILITY => Err(insufficient(what, n)),
        _ => Ok(()),
    }
}
