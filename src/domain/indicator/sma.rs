//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]), maintained as a compensated running sum
//! so each step is O(1). A window of identical closes averages to exactly
//! that close. Warmup: first (n-1) values are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::stats::RollingSum;

pub fn calculate_sma(closes: &[f64], window: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(window);
    if window == 0 || closes.len() < window {
        return IndicatorSeries::undefined(indicator_type, closes.len());
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut sum = RollingSum::default();

    for (i, &close) in closes.iter().enumerate() {
        sum.push(close);
        if i >= window {
            sum.pop(closes[i - window]);
        }
        if i + 1 >= window {
            values.push(Some(sum.mean(window)));
        } else {
            values.push(None);
        }
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

/// Short and long simple moving averages over the same closes.
pub fn moving_averages(
    closes: &[f64],
    short: usize,
    long: usize,
) -> (IndicatorSeries, IndicatorSeries) {
    (calculate_sma(closes, short), calculate_sma(closes, long))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_eq!(series.values.len(), 5);
        assert!(series.values[0].is_none());
        assert!(series.values[1].is_none());
        assert_relative_eq!(series.values[2].unwrap(), 20.0);
        assert_relative_eq!(series.values[3].unwrap(), 30.0);
        assert_relative_eq!(series.values[4].unwrap(), 40.0);
    }

    #[test]
    fn sma_matches_naive_mean() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + ((i * 7) % 11) as f64 * 0.37).collect();
        let series = calculate_sma(&closes, 10);
        for i in 9..closes.len() {
            let naive = closes[i + 1 - 10..=i].iter().sum::<f64>() / 10.0;
            assert_relative_eq!(series.values[i].unwrap(), naive, epsilon = 1e-9);
        }
    }

    #[test]
    fn sma_window_1_is_identity() {
        let series = calculate_sma(&[3.0, 4.0], 1);
        assert_eq!(series.values, vec![Some(3.0), Some(4.0)]);
    }

    #[test]
    fn sma_short_input_is_all_undefined() {
        let series = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(series.values, vec![None, None]);
    }

    #[test]
    fn sma_zero_window() {
        let series = calculate_sma(&[1.0, 2.0], 0);
        assert_eq!(series.values, vec![None, None]);
        assert_eq!(series.indicator_type, IndicatorType::Sma(0));
    }

    #[test]
    fn moving_averages_pair() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let (short, long) = moving_averages(&closes, 2, 4);
        assert_eq!(short.indicator_type, IndicatorType::Sma(2));
        assert_eq!(long.indicator_type, IndicatorType::Sma(4));
        assert_relative_eq!(short.latest().unwrap(), 3.5);
        assert_relative_eq!(long.latest().unwrap(), 2.5);
    }

    #[test]
    fn constant_prices_have_equal_averages() {
        let closes = vec![100.0; 120];
        let (short, long) = moving_averages(&closes, 20, 100);
        assert_eq!(short.latest(), long.latest());
    }

    #[test]
    fn flat_tail_after_varying_history_is_exact() {
        let mut closes: Vec<f64> = (0..150)
            .map(|i| 80.0 + (i as f64 * 0.61).sin() * 9.3 + ((i * 13) % 7) as f64 * 0.017)
            .collect();
        let flat = 77.757557511236;
        closes.extend(std::iter::repeat_n(flat, 120));
        let (short, long) = moving_averages(&closes, 20, 100);
        for i in 249..closes.len() {
            assert_eq!(short.values[i], Some(flat), "short average drifted at {}", i);
            assert_eq!(long.values[i], Some(flat), "long average drifted at {}", i);
        }
    }
}
