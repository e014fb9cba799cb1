//! Technical indicator implementations.
//!
//! Every indicator is a pure function of a close-price slice and returns an
//! [`IndicatorSeries`] with exactly one entry per input observation. Entries
//! inside the warm-up window are `None`.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: an aligned series of optional values
//! - `IndicatorParams` / `IndicatorSet`: the bundle consumed by signals and scoring

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdSeries};
pub use rsi::calculate_rsi;
pub use sma::{calculate_sma, moving_averages};

use crate::domain::price_series::PriceSeries;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl IndicatorType {
    /// Number of observations needed before the first defined value.
    pub fn warmup(&self) -> usize {
        match self {
            IndicatorType::Sma(window) | IndicatorType::Rsi(window) => *window,
            IndicatorType::Ema(_)
            | IndicatorType::Macd { .. }
            | IndicatorType::MacdSignal { .. } => 1,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(window) => write!(f, "RSI({})", window),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_SIGNAL({},{},{})", fast, slow, signal)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub(crate) fn undefined(indicator_type: IndicatorType, len: usize) -> Self {
        Self {
            indicator_type,
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value at the most recent observation, if defined.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

/// Windows and spans used to build an [`IndicatorSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndicatorParams {
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ma_short_window: usize,
    pub ma_long_window: usize,
}

pub const DEFAULT_RSI_WINDOW: usize = 14;
pub const DEFAULT_MA_SHORT: usize = 20;
pub const DEFAULT_MA_LONG: usize = 100;

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_window: DEFAULT_RSI_WINDOW,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            ma_short_window: DEFAULT_MA_SHORT,
            ma_long_window: DEFAULT_MA_LONG,
        }
    }
}

impl IndicatorParams {
    /// The longest warm-up any indicator in the set needs.
    pub fn required_history(&self) -> usize {
        self.rsi_window
            .max(self.ma_short_window)
            .max(self.ma_long_window)
            .max(1)
    }
}

/// All indicators for one price series, aligned to its index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndicatorSet {
    pub params: IndicatorParams,
    pub rsi: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub macd_signal: IndicatorSeries,
    pub ma_short: IndicatorSeries,
    pub ma_long: IndicatorSeries,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Self {
        let closes = series.closes();
        let MacdSeries { macd, signal_line } = calculate_macd(
            &closes,
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        );
        let (ma_short, ma_long) =
            moving_averages(&closes, params.ma_short_window, params.ma_long_window);

        Self {
            params: *params,
            rsi: calculate_rsi(&closes, params.rsi_window),
            macd,
            macd_signal: signal_line,
            ma_short,
            ma_long,
        }
    }

    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    /// Every series in a fixed order: rsi, macd, macd_signal, ma_short, ma_long.
    pub fn series(&self) -> [&IndicatorSeries; 5] {
        [
            &self.rsi,
            &self.macd,
            &self.macd_signal,
            &self.ma_short,
            &self.ma_long,
        ]
    }
}
