//! CSV file data adapter.
//!
//! One file per ticker, `<dir>/<TICKER>.csv`, with a header row naming at
//! least a `date` and a `close` column.

use crate::domain::error::PricescopeError;
use crate::domain::period::Period;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_points(&self, ticker: &str) -> Result<Vec<PricePoint>, PricescopeError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| PricescopeError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| PricescopeError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| PricescopeError::DataSource {
                    reason: format!("missing {} column in {}", name, path.display()),
                })
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| PricescopeError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                PricescopeError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let close_str = record.get(close_col).unwrap_or("").trim();
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                tracing::warn!(ticker, %date, "skipping row without close");
                continue;
            }
            let close: f64 = close_str.parse().map_err(|e| PricescopeError::DataSource {
                reason: format!("invalid close value '{}': {}", close_str, e),
            })?;

            points.push(PricePoint::new(date, close));
        }

        // Stable sort keeps file order among equal dates, so the later row wins.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(prev) if prev.date == point.date => {
                    tracing::warn!(ticker, date = %point.date, "duplicate date, keeping later row");
                    *prev = point;
                }
                _ => deduped.push(point),
            }
        }
        Ok(deduped)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(&self, ticker: &str, period: Period) -> Result<PriceSeries, PricescopeError> {
        let points = self.read_points(ticker)?;
        let last_date = match points.last() {
            Some(p) => p.date,
            None => {
                return Err(PricescopeError::NoData {
                    ticker: ticker.to_string(),
                });
            }
        };
        let series = PriceSeries::new(points)?;
        Ok(match period.start_from(last_date) {
            Some(start) => series.since(start),
            None => series,
        })
    }

    fn list_tickers(&self) -> Result<Vec<String>, PricescopeError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| PricescopeError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PricescopeError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                tickers.push(stem.to_string_lossy().into_owned());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
