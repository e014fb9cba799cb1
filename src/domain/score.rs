//! Composite scoring and recommendations.
//!
//! Each factor contributes exactly one point in its direction:
//! - RSI: < 30 → +1, > 70 → -1, otherwise 0
//! - MACD: macd > signal → +1, otherwise -1
//! - MA: short > long → +1, otherwise -1
//! - Forecast: Up → +1, Down → -1, Neutral → 0
//!
//! score ≥ 3 → StrongBuy, score ≤ -3 → StrongSell, otherwise Hold.

use crate::domain::error::AnalysisError;
use crate::domain::forecast::{Forecast, ForecastProvider};
use crate::domain::indicator::{IndicatorParams, IndicatorSeries, IndicatorSet};
use crate::domain::price_series::PriceSeries;
use std::fmt;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const STRONG_SCORE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Recommendation {
    StrongBuy,
    StrongSell,
    Hold,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        if score >= STRONG_SCORE {
            Recommendation::StrongBuy
        } else if score <= -STRONG_SCORE {
            Recommendation::StrongSell
        } else {
            Recommendation::Hold
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::StrongBuy => write!(f, "Strong Buy"),
            Recommendation::StrongSell => write!(f, "Strong Sell"),
            Recommendation::Hold => write!(f, "Hold"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeScore {
    pub score: i32,
    pub rsi: f64,
    pub macd_diff: f64,
    pub ma_diff: f64,
    pub forecast: Forecast,
    pub recommendation: Recommendation,
}

/// Latest indicator readings plus the forecast for one asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub forecast: Forecast,
}

impl ScoreInputs {
    /// Reads the most recent value of every indicator in `set`.
    pub fn latest(set: &IndicatorSet, forecast: Forecast) -> Result<Self, AnalysisError> {
        Ok(Self {
            rsi: latest_value(&set.rsi)?,
            macd: latest_value(&set.macd)?,
            macd_signal: latest_value(&set.macd_signal)?,
            ma_short: latest_value(&set.ma_short)?,
            ma_long: latest_value(&set.ma_long)?,
            forecast,
        })
    }

    pub fn rsi_points(&self) -> i32 {
        if self.rsi < RSI_OVERSOLD {
            1
        } else if self.rsi > RSI_OVERBOUGHT {
            -1
        } else {
            0
        }
    }

    pub fn macd_points(&self) -> i32 {
        if self.macd > self.macd_signal { 1 } else { -1 }
    }

    pub fn ma_points(&self) -> i32 {
        if self.ma_short > self.ma_long { 1 } else { -1 }
    }

    pub fn score(&self) -> CompositeScore {
        let score =
            self.rsi_points() + self.macd_points() + self.ma_points() + self.forecast.points();
        CompositeScore {
            score,
            rsi: self.rsi,
            macd_diff: self.macd - self.macd_signal,
            ma_diff: self.ma_short - self.ma_long,
            forecast: self.forecast,
            recommendation: Recommendation::from_score(score),
        }
    }
}

fn latest_value(series: &IndicatorSeries) -> Result<f64, AnalysisError> {
    series
        .latest()
        .ok_or_else(|| AnalysisError::InsufficientData {
            indicator: series.indicator_type.to_string(),
            required: series.indicator_type.warmup(),
            available: series.len(),
        })
}

/// Scores the most recent observation of `series`.
///
/// Indicators are checked before the forecast provider is consulted, so a
/// short series never triggers a provider call.
pub fn score_asset(
    series: &PriceSeries,
    ticker: &str,
    params: &IndicatorParams,
    provider: &dyn ForecastProvider,
) -> Result<CompositeScore, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let set = IndicatorSet::compute(series, params);
    // validate with a placeholder, then fill in the real forecast
    let inputs = ScoreInputs::latest(&set, Forecast::Neutral)?;
    let forecast = provider.forecast(ticker)?;
    Ok(ScoreInputs { forecast, ..inputs }.score())
}

/// Three-factor technical read without a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TechnicalSignal {
    Buy,
    Sell,
    NoClearSignal,
}

impl fmt::Display for TechnicalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TechnicalSignal::Buy => write!(f, "Buy"),
            TechnicalSignal::Sell => write!(f, "Sell"),
            TechnicalSignal::NoClearSignal => write!(f, "No Clear Signal"),
        }
    }
}

/// `Buy` when RSI is oversold and both crossovers are bullish, `Sell` when
/// RSI is overbought and neither crossover is bullish.
pub fn technical_signal(set: &IndicatorSet) -> Result<TechnicalSignal, AnalysisError> {
    let inputs = ScoreInputs::latest(set, Forecast::Neutral)?;
    let macd_cross = inputs.macd > inputs.macd_signal;
    let ma_cross = inputs.ma_short > inputs.ma_long;

    Ok(if inputs.rsi < RSI_OVERSOLD && macd_cross && ma_cross {
        TechnicalSignal::Buy
    } else if inputs.rsi > RSI_OVERBOUGHT && !macd_cross && !ma_cross {
        TechnicalSignal::Sell
    } else {
        TechnicalSignal::NoClearSignal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ForecastError;
    use crate::domain::forecast::FixedForecast;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn inputs(rsi: f64, macd_up: bool, ma_up: bool, forecast: Forecast) -> ScoreInputs {
        ScoreInputs {
            rsi,
            macd: if macd_up { 1.0 } else { -1.0 },
            macd_signal: 0.0,
            ma_short: if ma_up { 101.0 } else { 99.0 },
            ma_long: 100.0,
            forecast,
        }
    }

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes)
    }

    struct FailingProvider;

    impl ForecastProvider for FailingProvider {
        fn forecast(&self, ticker: &str) -> Result<Forecast, ForecastError> {
            Err(ForecastError {
                ticker: ticker.to_string(),
                reason: "offline".into(),
            })
        }
    }

    struct CountingProvider(AtomicUsize);

    impl ForecastProvider for CountingProvider {
        fn forecast(&self, _ticker: &str) -> Result<Forecast, ForecastError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Forecast::Up)
        }
    }

    #[test]
    fn all_bullish_is_strong_buy() {
        let s = inputs(25.0, true, true, Forecast::Up).score();
        assert_eq!(s.score, 4);
        assert_eq!(s.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn all_bearish_is_strong_sell() {
        let s = inputs(75.0, false, false, Forecast::Down).score();
        assert_eq!(s.score, -4);
        assert_eq!(s.recommendation, Recommendation::StrongSell);
    }

    #[test]
    fn neutral_rsi_band_is_inclusive() {
        assert_eq!(inputs(30.0, true, true, Forecast::Neutral).rsi_points(), 0);
        assert_eq!(inputs(70.0, true, true, Forecast::Neutral).rsi_points(), 0);
        assert_eq!(inputs(29.99, true, true, Forecast::Neutral).rsi_points(), 1);
        assert_eq!(inputs(70.01, true, true, Forecast::Neutral).rsi_points(), -1);
    }

    #[test]
    fn ties_count_against() {
        let mut i = inputs(50.0, true, true, Forecast::Neutral);
        i.macd = i.macd_signal;
        i.ma_short = i.ma_long;
        assert_eq!(i.macd_points(), -1);
        assert_eq!(i.ma_points(), -1);
        assert_eq!(i.score().score, -2);
    }

    #[test]
    fn recommendation_thresholds() {
        assert_eq!(Recommendation::from_score(3), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_score(2), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(-2), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(-3), Recommendation::StrongSell);
    }

    #[test]
    fn diffs_reported() {
        let s = inputs(50.0, true, false, Forecast::Neutral).score();
        assert_eq!(s.macd_diff, 1.0);
        assert_eq!(s.ma_diff, -1.0);
        assert_eq!(s.rsi, 50.0);
    }

    #[test]
    fn score_asset_short_series_is_insufficient() {
        let s = series(&[100.0; 50]);
        let err = score_asset(&s, "AAPL", &IndicatorParams::default(), &FixedForecast(Forecast::Up))
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                indicator: "SMA(100)".into(),
                required: 100,
                available: 50,
            }
        );
    }

    #[test]
    fn score_asset_empty_series() {
        let err = score_asset(
            &PriceSeries::default(),
            "AAPL",
            &IndicatorParams::default(),
            &FixedForecast(Forecast::Up),
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::EmptySeries);
    }

    #[test]
    fn provider_not_called_for_short_series() {
        let provider = CountingProvider(AtomicUsize::new(0));
        let _ = score_asset(&series(&[1.0; 10]), "X", &IndicatorParams::default(), &provider);
        assert_eq!(provider.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn provider_failure_propagates() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64).collect();
        let err = score_asset(&series(&closes), "AAPL", &IndicatorParams::default(), &FailingProvider)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Forecast(ref e) if e.ticker == "AAPL"));
    }

    #[test]
    fn rising_series_scores_bullish_trend() {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let s = score_asset(&series(&closes), "UP", &IndicatorParams::default(), &FixedForecast(Forecast::Up))
            .unwrap();
        // RSI pinned at 100 (no losses) → -1; MACD +1; MA +1; forecast +1
        assert_eq!(s.rsi, 100.0);
        assert_eq!(s.score, 2);
        assert_eq!(s.recommendation, Recommendation::Hold);
    }

    #[test]
    fn technical_signal_reads() {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 * 0.99_f64.powi(i)).collect();
        let params = IndicatorParams {
            ma_long_window: 50,
            ..IndicatorParams::default()
        };
        let set = IndicatorSet::compute(&series(&closes), &params);
        // falling: RSI 0, MACD below signal, short MA below long → no Sell
        // because RSI is oversold, and no Buy because crossovers are bearish
        assert_eq!(technical_signal(&set).unwrap(), TechnicalSignal::NoClearSignal);

        let flat = IndicatorSet::compute(&series(&[10.0; 5]), &params);
        assert!(technical_signal(&flat).is_err());
    }
}
