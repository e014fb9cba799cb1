//! Summary statistics over partially defined series.

/// Arithmetic mean of the defined values, `None` when there are none.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Sample standard deviation (n - 1 denominator) of the defined values.
///
/// Undefined (`None`) with fewer than two defined values.
pub fn sample_std_dev(values: &[Option<f64>]) -> Option<f64> {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    if defined.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = defined.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (defined.len() - 1) as f64).sqrt())
}

/// Kahan-compensated sum over a sliding window.
///
/// Values are pushed as they enter the window and popped as they leave.
/// While the last `window` pushed values are all equal, [`RollingSum::mean`]
/// returns that value exactly instead of the accumulated sum.
#[derive(Debug, Default, Clone)]
pub struct RollingSum {
    sum: f64,
    compensation: f64,
    last: Option<f64>,
    run: usize,
}

impl RollingSum {
    pub fn push(&mut self, value: f64) {
        self.accumulate(value);
        if self.last == Some(value) {
            self.run += 1;
        } else {
            self.last = Some(value);
            self.run = 1;
        }
    }

    pub fn pop(&mut self, value: f64) {
        self.accumulate(-value);
    }

    /// Mean of the last `window` pushed values.
    pub fn mean(&self, window: usize) -> f64 {
        match self.last {
            Some(value) if self.run >= window => value,
            _ => self.sum / window as f64,
        }
    }

    fn accumulate(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }
}
