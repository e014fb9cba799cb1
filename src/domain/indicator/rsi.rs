//! RSI (Relative Strength Index).
//!
//! gain = max(delta, 0), loss = max(-delta, 0), each averaged with a simple
//! rolling mean over `window` periods (compensated running sums, O(n)). The first
//! observation has no prior close and contributes a zero delta.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100. This also covers a flat window where both
//! averages are zero.
//!
//! Warmup: first (window-1) values are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::stats::RollingSum;

pub fn calculate_rsi(closes: &[f64], window: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(window);
    if window == 0 || closes.len() < window {
        return IndicatorSeries::undefined(indicator_type, closes.len());
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut gain_sum = RollingSum::default();
    let mut loss_sum = RollingSum::default();

    for i in 0..closes.len() {
        gain_sum.push(gains[i]);
        loss_sum.push(losses[i]);
        if i >= window {
            gain_sum.pop(gains[i - window]);
            loss_sum.pop(losses[i - window]);
        }

        if i + 1 < window {
            values.push(None);
            continue;
        }

        // running sums can drift a hair below zero
        let avg_gain = gain_sum.mean(window).max(0.0);
        let avg_loss = loss_sum.mean(window).max(0.0);
        values.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
