//! Ordered close-price observations.

use crate::domain::error::AnalysisError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Close prices with strictly increasing dates.
///
/// Immutable once constructed. Every derived series produced by the
/// analytics modules has exactly `len()` entries so results can be zipped
/// by position with [`PriceSeries::dates`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AnalysisError> {
        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalysisError::invalid(
                "dates",
                format!(
                    "dates must be strictly increasing ({} followed by {})",
                    w[0].date, w[1].date
                ),
            ));
        }
        Ok(Self { points })
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| PricePoint { date, close })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Keep only the observations dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        let points = self
            .points
            .iter()
            .copied()
            .filter(|p| p.date >= start)
            .collect();
        Self { points }
    }

    /// Simple period-over-period returns; index 0 has no prior close.
    pub fn pct_change(&self) -> Vec<Option<f64>> {
        self.pairwise(|prev, curr| curr / prev - 1.0)
    }

    /// `ln(close[t] / close[t-1])`; index 0 has no prior close.
    pub fn log_returns(&self) -> Vec<Option<f64>> {
        self.pairwise(|prev, curr| (curr / prev).ln())
    }

    fn pairwise(&self, f: impl Fn(f64, f64) -> f64) -> Vec<Option<f64>> {
        let mut out = Vec::with_capacity(self.points.len());
        if self.points.is_empty() {
            return out;
        }
        out.push(None);
        out.extend(self.points.windows(2).map(|w| Some(f(w[0].close, w[1].close))));
        out
    }
}
