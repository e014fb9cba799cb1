//! Moving-average crossover signals and position-change events.
//!
//! Signal is `Long` only when both averages are defined and the short average
//! is strictly above the long one. Ties and warm-up gaps resolve to `Flat`.

use crate::domain::indicator::IndicatorSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Signal {
    Long,
    Flat,
}

impl Signal {
    pub fn is_long(self) -> bool {
        self == Signal::Long
    }

    /// Unit exposure held while this signal is active.
    pub fn exposure(self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Flat => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PositionKind {
    Enter,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PositionEvent {
    pub date: NaiveDate,
    /// Position in the source price series.
    pub index: usize,
    pub kind: PositionKind,
}

pub fn signal_at(short: Option<f64>, long: Option<f64>) -> Signal {
    match (short, long) {
        (Some(s), Some(l)) if s > l => Signal::Long,
        _ => Signal::Flat,
    }
}

pub fn generate_signals(ma_short: &IndicatorSeries, ma_long: &IndicatorSeries) -> Vec<Signal> {
    debug_assert_eq!(ma_short.len(), ma_long.len());
    ma_short
        .values
        .iter()
        .zip(&ma_long.values)
        .map(|(&s, &l)| signal_at(s, l))
        .collect()
}

/// Events at every Flat→Long (`Enter`) and Long→Flat (`Exit`) transition.
///
/// The first observation has no predecessor and never emits an event.
/// Transitions past the end of the shorter input are ignored.
pub fn position_events(dates: &[NaiveDate], signals: &[Signal]) -> Vec<PositionEvent> {
    signals
        .windows(2)
        .zip(dates.iter().skip(1))
        .enumerate()
        .filter_map(|(i, (w, &date))| {
            let kind = match (w[0], w[1]) {
                (Signal::Flat, Signal::Long) => PositionKind::Enter,
                (Signal::Long, Signal::Flat) => PositionKind::Exit,
                _ => return None,
            };
            Some(PositionEvent {
                date,
                index: i + 1,
                kind,
            })
        })
        .collect()
}
