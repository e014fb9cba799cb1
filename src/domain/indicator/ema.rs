//! Exponential Moving Average.
//!
//! α = 2/(span+1), unadjusted recurrence EMA[i] = α*x[i] + (1-α)*EMA[i-1],
//! seeded with the first observation. Defined from index 0.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(values: &[f64], span: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(span);
    if span == 0 {
        return IndicatorSeries::undefined(indicator_type, values.len());
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema: Option<f64> = None;

    for &x in values {
        let next = match ema {
            None => x,
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
        };
        ema = Some(next);
        out.push(ema);
    }

    IndicatorSeries {
        indicator_type,
        values: out,
    }
}
