//! Log-normal price range projection.
//!
//! vol = stdev(log returns) * √horizon_days
//! z   = Φ⁻¹(1 - (1 - confidence) / 2)
//! range = last_price * exp(±z * vol)
//!
//! Log returns are assumed i.i.d., so volatility scales with √time.

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PriceSeries;
use crate::domain::risk::{insufficient, MIN_OBSERVATIONS_FOR_VOLATILITY};
use crate::domain::stats::sample_std_dev;
use statrs::distribution::{ContinuousCDF, Normal};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RangeEstimate {
    pub last_price: f64,
    pub lower: f64,
    pub upper: f64,
    /// Standard deviation of the horizon-period log return.
    pub projected_volatility: f64,
    pub horizon_days: u32,
    pub confidence: f64,
}

pub fn validate_confidence(confidence: f64) -> Result<(), AnalysisError> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid(
            "confidence",
            format!("must be strictly between 0 and 1, got {}", confidence),
        ))
    }
}

/// Two-sided standard-normal quantile for `confidence`.
pub fn two_sided_z(confidence: f64) -> Result<f64, AnalysisError> {
    validate_confidence(confidence)?;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AnalysisError::invalid("normal", e.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0))
}

/// Band around `last_price` for an already-projected log-return volatility.
pub fn range_from_volatility(
    last_price: f64,
    projected_volatility: f64,
    confidence: f64,
) -> Result<(f64, f64), AnalysisError> {
    let z = two_sided_z(confidence)?;
    Ok((
        last_price * (-z * projected_volatility).exp(),
        last_price * (z * projected_volatility).exp(),
    ))
}

pub fn estimate_range(
    series: &PriceSeries,
    horizon_days: u32,
    confidence: f64,
) -> Result<RangeEstimate, AnalysisError> {
    validate_confidence(confidence)?;
    if horizon_days == 0 {
        return Err(AnalysisError::invalid("horizon_days", "must be positive"));
    }

    let last_price = match (series.len(), series.last()) {
        (0, _) | (_, None) => return Err(AnalysisError::EmptySeries),
        (n, _) if n < MIN_OBSERVATIONS_FOR_VOLATILITY => {
            return Err(insufficient("log_returns", n));
        }
        (_, Some(point)) => point.close,
    };

    let daily = sample_std_dev(&series.log_returns())
        .ok_or_else(|| insufficient("log_returns", series.len()))?;
    let projected_volatility = daily * f64::from(horizon_days).sqrt();
    let (lower, upper) = range_from_volatility(last_price, projected_volatility, confidence)?;

    Ok(RangeEstimate {
        last_price,
        lower,
        upper,
        projected_volatility,
        horizon_days,
        confidence,
    })
}
