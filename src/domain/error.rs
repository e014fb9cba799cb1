//! Domain error types.

/// Failure reported by a forecast provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("forecast unavailable for {ticker}: {reason}")]
pub struct ForecastError {
    pub ticker: String,
    pub reason: String,
}

/// Value-level failures of the analytics core.
///
/// The core never logs or retries; every failure is returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("insufficient data for {indicator}: have {available} observations, need {required}")]
    InsufficientData {
        indicator: String,
        required: usize,
        available: usize,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

impl AnalysisError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for pricescope.
#[derive(Debug, thiserror::Error)]
pub enum PricescopeError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PricescopeError> for std::process::ExitCode {
    fn from(err: &PricescopeError) -> Self {
        let code: u8 = match err {
            PricescopeError::Io(_) => 1,
            PricescopeError::ConfigParse { .. }
            | PricescopeError::ConfigMissing { .. }
            | PricescopeError::ConfigInvalid { .. } => 2,
            PricescopeError::DataSource { .. } => 3,
            PricescopeError::Analysis(AnalysisError::Forecast(_)) => 4,
            PricescopeError::NoData { .. }
            | PricescopeError::Analysis(AnalysisError::EmptySeries)
            | PricescopeError::Analysis(AnalysisError::InsufficientData { .. }) => 5,
            PricescopeError::Analysis(AnalysisError::InvalidParameter { .. }) => 6,
        };
        std::process::ExitCode::from(code)
    }
}
