//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//!
//! Default parameters: fast=12, slow=26, signal=9. Both lines are defined
//! from the first observation because the EMAs are seeded with it.

use crate::domain::indicator::{calculate_ema, IndicatorSeries, IndicatorType};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal_line: IndicatorSeries,
}

impl MacdSeries {
    /// MACD minus signal line at each observation.
    pub fn histogram(&self) -> Vec<Option<f64>> {
        self.macd
            .values
            .iter()
            .zip(&self.signal_line.values)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect()
    }
}

pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let line_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    let signal_type = IndicatorType::MacdSignal {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        return MacdSeries {
            macd: IndicatorSeries::undefined(line_type, closes.len()),
            signal_line: IndicatorSeries::undefined(signal_type, closes.len()),
        };
    }

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let line: Vec<f64> = ema_fast
        .values
        .iter()
        .zip(&ema_slow.values)
        .map(|(f, s)| f.unwrap_or(0.0) - s.unwrap_or(0.0))
        .collect();
    let signal = calculate_ema(&line, signal_period);

    MacdSeries {
        macd: IndicatorSeries {
            indicator_type: line_type,
            values: line.into_iter().map(Some).collect(),
        },
        signal_line: IndicatorSeries {
            indicator_type: signal_type,
            values: signal.values,
        },
    }
}

pub fn calculate_macd_default(closes: &[f64]) -> MacdSeries {
    calculate_macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let closes = ramp(30);
        let series = calculate_macd(&closes, 3, 5, 2);
        let fast = calculate_ema(&closes, 3);
        let slow = calculate_ema(&closes, 5);

        for i in 0..closes.len() {
            let expected = fast.values[i].unwrap() - slow.values[i].unwrap();
            assert_relative_eq!(series.macd.values[i].unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn signal_is_ema_of_macd() {
        let closes = ramp(40);
        let series = calculate_macd_default(&closes);
        let line: Vec<f64> = series.macd.values.iter().map(|v| v.unwrap()).collect();
        let expected = calculate_ema(&line, DEFAULT_SIGNAL);
        assert_eq!(series.signal_line.values, expected.values);
    }

    #[test]
    fn both_lines_defined_from_first_observation() {
        let series = calculate_macd_default(&ramp(3));
        assert_eq!(series.macd.values[0], Some(0.0));
        assert_eq!(series.signal_line.values[0], Some(0.0));
    }

    #[test]
    fn rising_prices_give_positive_macd() {
        let series = calculate_macd_default(&ramp(60));
        assert!(series.macd.latest().unwrap() > 0.0);
    }

    #[test]
    fn histogram_equals_line_minus_signal() {
        let series = calculate_macd_default(&ramp(40));
        let hist = series.histogram();
        for i in 0..40 {
            let expected = series.macd.values[i].unwrap() - series.signal_line.values[i].unwrap();
            assert_relative_eq!(hist[i].unwrap(), expected);
        }
    }

    #[test]
    fn macd_zero_period() {
        let closes = ramp(3);
        for (f, s, g) in [(0, 26, 9), (12, 0, 9), (12, 26, 0)] {
            let series = calculate_macd(&closes, f, s, g);
            assert_eq!(series.macd.values, vec![None; 3]);
            assert_eq!(series.signal_line.values, vec![None; 3]);
        }
    }

    #[test]
    fn macd_indicator_types() {
        let series = calculate_macd(&ramp(3), 5, 10, 3);
        assert_eq!(
            series.macd.indicator_type,
            IndicatorType::Macd {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
        assert_eq!(
            series.signal_line.indicator_type,
            IndicatorType::MacdSignal {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
    }

    #[test]
    fn constant_prices_converge_to_zero() {
        let series = calculate_macd_default(&[100.0; 30]);
        assert_relative_eq!(series.macd.latest().unwrap(), 0.0);
        assert_relative_eq!(series.signal_line.latest().unwrap(), 0.0);
    }

    #[test]
    fn macd_empty() {
        let series = calculate_macd_default(&[]);
        assert!(series.macd.is_empty());
        assert!(series.signal_line.is_empty());
    }
}
