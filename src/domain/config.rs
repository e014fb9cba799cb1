//! Resolved analysis settings.

use crate::domain::backtest::BacktestConfig;
use crate::domain::indicator::IndicatorParams;
use crate::domain::period::Period;
use crate::domain::risk::TRADING_DAYS_PER_YEAR;

pub const DEFAULT_HORIZON_DAYS: u32 = 30;
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub period: Period,
    pub horizon_days: u32,
    pub confidence: f64,
    pub trading_days_per_year: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            period: Period::default(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            confidence: DEFAULT_CONFIDENCE,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl AnalysisConfig {
    /// Crossover backtest driven by the configured moving-average windows.
    pub fn backtest(&self) -> BacktestConfig {
        BacktestConfig {
            short_window: self.indicators.ma_short_window,
            long_window: self.indicators.ma_long_window,
        }
    }
}
