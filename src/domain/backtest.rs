//! Long/flat moving-average crossover backtest.
//!
//! The position held over period `t` is the signal observed at `t-1`, so a
//! crossover is never traded on the bar that revealed it. Strategy and
//! buy-and-hold equity both compound from 1.0 at the first observation where
//! both moving averages are defined.

use crate::domain::error::AnalysisError;
use crate::domain::indicator::{moving_averages, DEFAULT_MA_LONG, DEFAULT_MA_SHORT};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{generate_signals, position_events, PositionEvent, PositionKind, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BacktestConfig {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_MA_SHORT,
            long_window: DEFAULT_MA_LONG,
        }
    }
}

impl BacktestConfig {
    /// Index of the first observation with both averages defined.
    pub fn first_valid_index(&self) -> usize {
        self.short_window.max(self.long_window).saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BacktestResult {
    pub strategy_equity: Vec<Option<f64>>,
    pub buy_hold_equity: Vec<Option<f64>>,
    pub signals: Vec<Signal>,
    pub entries: Vec<PositionEvent>,
    pub exits: Vec<PositionEvent>,
}

impl BacktestResult {
    /// Final strategy equity minus one, if the warm-up ever completed.
    pub fn total_strategy_return(&self) -> Option<f64> {
        last_defined(&self.strategy_equity).map(|e| e - 1.0)
    }

    pub fn total_buy_hold_return(&self) -> Option<f64> {
        last_defined(&self.buy_hold_equity).map(|e| e - 1.0)
    }

    /// Entries and exits merged in timestamp order.
    pub fn events(&self) -> Vec<PositionEvent> {
        let mut all: Vec<PositionEvent> =
            self.entries.iter().chain(&self.exits).copied().collect();
        all.sort_by_key(|e| e.index);
        all
    }
}

fn last_defined(values: &[Option<f64>]) -> Option<f64> {
    values.iter().rev().find_map(|v| *v)
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    if config.short_window == 0 {
        return Err(AnalysisError::invalid("short_window", "must be positive"));
    }
    if config.long_window == 0 {
        return Err(AnalysisError::invalid("long_window", "must be positive"));
    }

    let closes = series.closes();
    let (ma_short, ma_long) = moving_averages(&closes, config.short_window, config.long_window);
    let signals = generate_signals(&ma_short, &ma_long);
    let returns = series.pct_change();

    let n = series.len();
    let start = config.first_valid_index();
    let mut strategy_equity = vec![None; n];
    let mut buy_hold_equity = vec![None; n];

    if start < n {
        let mut strategy = 1.0;
        let mut buy_hold = 1.0;
        strategy_equity[start] = Some(strategy);
        buy_hold_equity[start] = Some(buy_hold);

        for t in (start + 1)..n {
            let period_return = returns[t].unwrap_or(0.0);
            strategy *= 1.0 + signals[t - 1].exposure() * period_return;
            buy_hold *= 1.0 + period_return;
            strategy_equity[t] = Some(strategy);
            buy_hold_equity[t] = Some(buy_hold);
        }
    }

    let (entries, exits): (Vec<PositionEvent>, Vec<PositionEvent>) =
        position_events(&series.dates(), &signals)
            .into_iter()
            .partition(|e| e.kind == PositionKind::Enter);

    Ok(BacktestResult {
        strategy_equity,
        buy_hold_equity,
        signals,
        entries,
        exits,
    })
}
