//! Configuration validation.
//!
//! Checks every analysis setting before any data is loaded. Absent keys
//! fall back to defaults and are not errors; `[data] path` is required.
//! A numeric key that is present must parse, since the typed getters fall
//! back to the default on malformed text.

use crate::domain::error::PricescopeError;
use crate::domain::period::Period;
use crate::domain::universe::parse_tickers;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    validate_data(config)?;
    validate_tickers(config)?;
    validate_number_syntax(config)?;
    validate_indicator_windows(config)?;
    validate_window_order(config)?;
    validate_range(config)?;
    validate_trading_days(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> PricescopeError {
    PricescopeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    if config.get_string("data", "path").is_none() {
        return Err(PricescopeError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        });
    }
    if let Some(period) = config.get_string("data", "period") {
        period
            .parse::<Period>()
            .map_err(|reason| invalid("data", "period", &reason))?;
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    if let Some(tickers) = config.get_string("assets", "tickers") {
        parse_tickers(&tickers).map_err(|e| invalid("assets", "tickers", &e.to_string()))?;
    }
    Ok(())
}

const INTEGER_KEYS: [(&str, &str); 7] = [
    ("indicators", "rsi_window"),
    ("indicators", "macd_fast"),
    ("indicators", "macd_slow"),
    ("indicators", "macd_signal"),
    ("indicators", "ma_short_window"),
    ("indicators", "ma_long_window"),
    ("range", "horizon_days"),
];

const FLOAT_KEYS: [(&str, &str); 2] = [("range", "confidence"), ("risk", "trading_days_per_year")];

fn validate_number_syntax(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    for (section, key) in INTEGER_KEYS {
        if let Some(raw) = config.get_string(section, key) {
            raw.parse::<i64>().map_err(|_| {
                invalid(section, key, &format!("{} must be an integer, got '{}'", key, raw))
            })?;
        }
    }
    for (section, key) in FLOAT_KEYS {
        if let Some(raw) = config.get_string(section, key) {
            raw.parse::<f64>().map_err(|_| {
                invalid(section, key, &format!("{} must be a number, got '{}'", key, raw))
            })?;
        }
    }
    Ok(())
}

const WINDOW_KEYS: [(&str, i64); 6] = [
    ("rsi_window", 14),
    ("macd_fast", 12),
    ("macd_slow", 26),
    ("macd_signal", 9),
    ("ma_short_window", 20),
    ("ma_long_window", 100),
];

fn validate_indicator_windows(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    for (key, default) in WINDOW_KEYS {
        if config.get_int("indicators", key, default) < 1 {
            return Err(invalid("indicators", key, &format!("{} must be at least 1", key)));
        }
    }
    Ok(())
}

fn validate_window_order(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    let fast = config.get_int("indicators", "macd_fast", 12);
    let slow = config.get_int("indicators", "macd_slow", 26);
    if fast >= slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    let short = config.get_int("indicators", "ma_short_window", 20);
    let long = config.get_int("indicators", "ma_long_window", 100);
    if short >= long {
        return Err(invalid(
            "indicators",
            "ma_short_window",
            "ma_short_window must be less than ma_long_window",
        ));
    }
    Ok(())
}

fn validate_range(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    let horizon = config.get_int("range", "horizon_days", 30);
    if horizon < 1 || horizon > i64::from(u32::MAX) {
        return Err(invalid("range", "horizon_days", "horizon_days must be a positive day count"));
    }
    let confidence = config.get_double("range", "confidence", 0.95);
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(invalid(
            "range",
            "confidence",
            "confidence must be strictly between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_trading_days(config: &dyn ConfigPort) -> Result<(), PricescopeError> {
    let value = config.get_double("risk", "trading_days_per_year", 252.0);
    if value.is_nan() || value <= 0.0 {
        return Err(invalid(
            "risk",
            "trading_days_per_year",
            "trading_days_per_year must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn with_data(rest: &str) -> FileConfigAdapter {
        make_config(&format!("[data]\npath = ./prices\n{}", rest))
    }

    #[test]
    fn full_config_passes() {
        let config = make_config(
            r#"
[data]
path = ./prices
period = 2y

[assets]
tickers = AAPL, MSFT

[indicators]
rsi_window = 14
macd_fast = 12
macd_slow = 26
macd_signal = 9
ma_short_window = 20
ma_long_window = 100

[range]
horizon_days = 30
confidence = 0.95

[risk]
trading_days_per_year = 252
"#,
        );
        assert!(validate_analysis_config(&config).is_ok());
    }

    #[test]
    fn defaults_pass() {
        assert!(validate_analysis_config(&with_data("")).is_ok());
    }

    #[test]
    fn missing_data_path_fails() {
        let err = validate_analysis_config(&make_config("[assets]\ntickers = AAPL\n")).unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigMissing { key, .. } if key == "path"));
    }

    #[test]
    fn unknown_period_fails() {
        let err = validate_analysis_config(&make_config("[data]\npath = x\nperiod = 10y\n")).unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "period"));
    }

    #[test]
    fn empty_ticker_token_fails() {
        let err = validate_analysis_config(&with_data("[assets]\ntickers = AAPL,,MSFT\n")).unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "tickers"));
    }

    #[test]
    fn zero_window_fails() {
        let err = validate_analysis_config(&with_data("[indicators]\nrsi_window = 0\n")).unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "rsi_window"));
    }

    #[test]
    fn negative_signal_window_fails() {
        let err = validate_analysis_config(&with_data("[indicators]\nmacd_signal = -3\n")).unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "macd_signal"));
    }

    #[test]
    fn macd_fast_not_below_slow_fails() {
        let err = validate_analysis_config(&with_data(
            "[indicators]\nmacd_fast = 26\nmacd_slow = 26\n",
        ))
        .unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "macd_fast"));
    }

    #[test]
    fn ma_short_not_below_long_fails() {
        let err = validate_analysis_config(&with_data(
            "[indicators]\nma_short_window = 100\nma_long_window = 50\n",
        ))
        .unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "ma_short_window"));
    }

    #[test]
    fn confidence_out_of_range_fails() {
        for value in ["0", "1", "1.5", "-0.2"] {
            let err = validate_analysis_config(&with_data(&format!(
                "[range]\nconfidence = {}\n",
                value
            )))
            .unwrap_err();
            assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "confidence"));
        }
    }

    #[test]
    fn malformed_numbers_fail() {
        for (section, key, value) in [
            ("range", "confidence", "abc"),
            ("risk", "trading_days_per_year", "many"),
            ("indicators", "rsi_window", "14.5"),
            ("range", "horizon_days", "thirty"),
        ] {
            let err = validate_analysis_config(&with_data(&format!(
                "[{}]\n{} = {}\n",
                section, key, value
            )))
            .unwrap_err();
            assert!(
                matches!(err, PricescopeError::ConfigInvalid { key: ref k, .. } if k == key),
                "{} = {} accepted",
                key,
                value
            );
        }
    }

    #[test]
    fn zero_horizon_fails() {
        let err = validate_analysis_config(&with_data("[range]\nhorizon_days = 0\n")).unwrap_err();
        assert!(matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "horizon_days"));
    }

    #[test]
    fn trading_days_must_be_positive() {
        let err =
            validate_analysis_config(&with_data("[risk]\ntrading_days_per_year = 0\n")).unwrap_err();
        assert!(
            matches!(err, PricescopeError::ConfigInvalid { key, .. } if key == "trading_days_per_year")
        );
    }
}
