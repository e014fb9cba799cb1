//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::static_forecast::StaticForecastProvider;
use crate::domain::backtest::run_backtest;
use crate::domain::config::{AnalysisConfig, DEFAULT_CONFIDENCE, DEFAULT_HORIZON_DAYS};
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::PricescopeError;
use crate::domain::forecast::{project_sma, ForecastProvider, DEFAULT_PROJECTION_WINDOW};
use crate::domain::indicator::{IndicatorParams, IndicatorSet};
use crate::domain::period::Period;
use crate::domain::price_series::PriceSeries;
use crate::domain::range::estimate_range;
use crate::domain::risk::{annualized_volatility_with, max_drawdown};
use crate::domain::score::{score_asset, technical_signal};
use crate::domain::signal::PositionKind;
use crate::domain::summary::summarize;
use crate::domain::universe::{load_watchlist, Watchlist};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "pricescope", about = "Price history analytics")]
pub struct Cli {
    /// Diagnostic verbosity on stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct Target {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Analyse these tickers instead of `[assets] tickers` (comma separated)
    #[arg(long)]
    pub ticker: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print RSI, MACD and moving averages
    Indicators {
        #[command(flatten)]
        target: Target,
        /// Number of most recent rows to print
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Print crossover entries and exits
    Signals {
        #[command(flatten)]
        target: Target,
    },
    /// Compare the crossover strategy with buy-and-hold
    Backtest {
        #[command(flatten)]
        target: Target,
    },
    /// Annualized volatility and maximum drawdown
    Risk {
        #[command(flatten)]
        target: Target,
    },
    /// Projected price range at a confidence level
    Range {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        horizon_days: Option<u32>,
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Composite score and recommendation
    Score {
        #[command(flatten)]
        target: Target,
    },
    /// Close range and long-term trend
    Summary {
        #[command(flatten)]
        target: Target,
    },
    /// Flat SMA projection over the coming days
    Project {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        horizon_days: Option<u32>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// What to print for each ticker of the watchlist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    Indicators { tail: usize },
    Signals,
    Backtest,
    Risk,
    Range,
    Score,
    Summary,
    Project { horizon_days: u32 },
}

pub fn init_tracing(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.log_level);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

pub fn execute(command: Command, out: &mut dyn Write) -> Result<(), PricescopeError> {
    let (target, report, overrides) = match command {
        Command::Validate { config } => return run_validate(&config, out),
        Command::ListTickers { config } => return run_list_tickers(&config, out),
        Command::Indicators { target, tail } => (target, Report::Indicators { tail }, None),
        Command::Signals { target } => (target, Report::Signals, None),
        Command::Backtest { target } => (target, Report::Backtest, None),
        Command::Risk { target } => (target, Report::Risk, None),
        Command::Range {
            target,
            horizon_days,
            confidence,
        } => (target, Report::Range, Some((horizon_days, confidence))),
        Command::Score { target } => (target, Report::Score, None),
        Command::Summary { target } => (target, Report::Summary, None),
        Command::Project {
            target,
            horizon_days,
        } => (
            target,
            Report::Project {
                horizon_days: horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS),
            },
            None,
        ),
    };

    // Stage 1: Load and validate config
    let adapter = load_config(&target.config)?;
    validate_analysis_config(&adapter)?;
    let mut config = build_analysis_config(&adapter)?;
    if let Some((horizon_days, confidence)) = overrides {
        config.horizon_days = horizon_days.unwrap_or(config.horizon_days);
        config.confidence = confidence.unwrap_or(config.confidence);
    }

    // Stage 2: Resolve data source, watchlist and forecast provider
    let data = CsvAdapter::new(data_path(&adapter, &target.config)?);
    let watchlist = resolve_tickers(target.ticker.as_deref(), &adapter)?;
    let provider = StaticForecastProvider::from_config(&adapter)?;

    // Stage 3: Analyse each ticker
    run_pipeline(&data, &config, &watchlist, report, &provider, out).map(|_| ())
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, PricescopeError> {
    tracing::debug!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| PricescopeError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// `[data] path`, relative paths resolved against the config file.
pub fn data_path(config: &dyn ConfigPort, config_path: &Path) -> Result<PathBuf, PricescopeError> {
    let raw = config
        .get_string("data", "path")
        .ok_or_else(|| PricescopeError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(config_path
        .parent()
        .map(|dir| dir.join(&path))
        .unwrap_or(path))
}

fn get_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, PricescopeError> {
    let value = config.get_int("indicators", key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| PricescopeError::ConfigInvalid {
            section: "indicators".into(),
            key: key.into(),
            reason: format!("{} must be at least 1", key),
        })
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, PricescopeError> {
    let defaults = IndicatorParams::default();
    let indicators = IndicatorParams {
        rsi_window: get_window(config, "rsi_window", defaults.rsi_window)?,
        macd_fast: get_window(config, "macd_fast", defaults.macd_fast)?,
        macd_slow: get_window(config, "macd_slow", defaults.macd_slow)?,
        macd_signal: get_window(config, "macd_signal", defaults.macd_signal)?,
        ma_short_window: get_window(config, "ma_short_window", defaults.ma_short_window)?,
        ma_long_window: get_window(config, "ma_long_window", defaults.ma_long_window)?,
    };

    let period = match config.get_string("data", "period") {
        Some(raw) => raw
            .parse::<Period>()
            .map_err(|reason| PricescopeError::ConfigInvalid {
                section: "data".into(),
                key: "period".into(),
                reason,
            })?,
        None => Period::default(),
    };

    let horizon = config.get_int("range", "horizon_days", i64::from(DEFAULT_HORIZON_DAYS));
    let horizon_days = u32::try_from(horizon).map_err(|_| PricescopeError::ConfigInvalid {
        section: "range".into(),
        key: "horizon_days".into(),
        reason: "horizon_days must be a positive day count".into(),
    })?;

    Ok(AnalysisConfig {
        indicators,
        period,
        horizon_days,
        confidence: config.get_double("range", "confidence", DEFAULT_CONFIDENCE),
        trading_days_per_year: config.get_double(
            "risk",
            "trading_days_per_year",
            AnalysisConfig::default().trading_days_per_year,
        ),
    })
}

/// `--ticker` wins over `[assets] tickers`.
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Watchlist, PricescopeError> {
    let (key, raw) = match ticker_override {
        Some(t) => ("--ticker", t.to_string()),
        None => (
            "tickers",
            config
                .get_string("assets", "tickers")
                .ok_or_else(|| PricescopeError::ConfigMissing {
                    section: "assets".into(),
                    key: "tickers".into(),
                })?,
        ),
    };
    Watchlist::parse(&raw).map_err(|e| PricescopeError::ConfigInvalid {
        section: "assets".into(),
        key: key.into(),
        reason: e.to_string(),
    })
}

/// Tickers analysed and tickers skipped by one pipeline run.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub analysed: Vec<String>,
    pub skipped: Vec<(String, PricescopeError)>,
}

/// Loads and reports every ticker of `watchlist`.
///
/// A ticker that fails to load or analyse is skipped with a warning. The
/// run fails only when no ticker succeeds, with the first ticker's error.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    config: &AnalysisConfig,
    watchlist: &Watchlist,
    report: Report,
    provider: &dyn ForecastProvider,
    out: &mut dyn Write,
) -> Result<PipelineOutcome, PricescopeError> {
    tracing::info!(
        "analysing {} tickers over {}",
        watchlist.len(),
        config.period
    );
    let mut outcome = PipelineOutcome::default();

    for loaded in load_watchlist(data_port, watchlist, config.period) {
        let ticker = loaded.ticker;
        let rendered = loaded.series.and_then(|series| {
            tracing::debug!("{}: {} observations", ticker, series.len());
            let mut buf = Vec::new();
            render_ticker(&mut buf, &ticker, &series, config, report, provider)?;
            Ok(buf)
        });
        match rendered {
            Ok(buf) => {
                out.write_all(&buf)?;
                outcome.analysed.push(ticker);
            }
            Err(e) => {
                tracing::warn!("skipping {} ({})", ticker, e);
                outcome.skipped.push((ticker, e));
            }
        }
    }

    if outcome.analysed.is_empty() {
        if let Some((_, first)) = outcome.skipped.into_iter().next() {
            return Err(first);
        }
        return Err(PricescopeError::NoData {
            ticker: "all".into(),
        });
    }
    if !outcome.skipped.is_empty() {
        tracing::info!(
            "reported {} of {} tickers",
            outcome.analysed.len(),
            watchlist.len()
        );
    }
    Ok(outcome)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

fn render_ticker(
    out: &mut dyn Write,
    ticker: &str,
    series: &PriceSeries,
    config: &AnalysisConfig,
    report: Report,
    provider: &dyn ForecastProvider,
) -> Result<(), PricescopeError> {
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        writeln!(
            out,
            "== {} ({} observations, {} to {}) ==",
            ticker,
            series.len(),
            first.date,
            last.date
        )?;
    }

    match report {
        Report::Indicators { tail } => {
            let set = IndicatorSet::compute(series, &config.indicators);
            let columns = set.series();
            let names: Vec<String> = columns
                .iter()
                .map(|s| s.indicator_type.to_string())
                .collect();
            writeln!(out, "{:<10} {:>12} {}", "date", "close", names.join(" "))?;
            let start = series.len().saturating_sub(tail);
            for (i, point) in series.points().iter().enumerate().skip(start) {
                let values: Vec<String> = columns
                    .iter()
                    .zip(&names)
                    .map(|(s, name)| format!("{:>width$}", fmt_opt(s.get(i)), width = name.len()))
                    .collect();
                writeln!(
                    out,
                    "{:<10} {:>12.4} {}",
                    point.date,
                    point.close,
                    values.join(" ")
                )?;
            }
        }
        Report::Signals => {
            let result = run_backtest(series, &config.backtest())?;
            for event in result.events() {
                let kind = match event.kind {
                    PositionKind::Enter => "ENTER",
                    PositionKind::Exit => "EXIT",
                };
                writeln!(out, "{} {}", event.date, kind)?;
            }
            let current = result.signals.last().map_or("Flat", |s| {
                if s.is_long() { "Long" } else { "Flat" }
            });
            writeln!(out, "current position: {}", current)?;
        }
        Report::Backtest => {
            let result = run_backtest(series, &config.backtest())?;
            writeln!(
                out,
                "strategy return:     {}",
                fmt_opt(result.total_strategy_return())
            )?;
            writeln!(
                out,
                "buy and hold return: {}",
                fmt_opt(result.total_buy_hold_return())
            )?;
            writeln!(
                out,
                "entries: {}  exits: {}",
                result.entries.len(),
                result.exits.len()
            )?;
        }
        Report::Risk => {
            let volatility = annualized_volatility_with(series, config.trading_days_per_year)?;
            let drawdown = max_drawdown(series)?;
            writeln!(out, "annualized volatility: {:.2}%", volatility * 100.0)?;
            writeln!(out, "max drawdown:          {:.2}%", drawdown * 100.0)?;
        }
        Report::Range => {
            let est = estimate_range(series, config.horizon_days, config.confidence)?;
            writeln!(out, "last price: {:.2}", est.last_price)?;
            writeln!(
                out,
                "{}-day range at {:.0}% confidence: {:.2} to {:.2}",
                est.horizon_days,
                est.confidence * 100.0,
                est.lower,
                est.upper
            )?;
            writeln!(out, "projected volatility: {:.4}", est.projected_volatility)?;
        }
        Report::Score => {
            let score = score_asset(series, ticker, &config.indicators, provider)?;
            let set = IndicatorSet::compute(series, &config.indicators);
            writeln!(out, "RSI:       {:.2}", score.rsi)?;
            writeln!(out, "MACD diff: {:.4}", score.macd_diff)?;
            writeln!(out, "MA diff:   {:.4}", score.ma_diff)?;
            writeln!(out, "forecast:  {}", score.forecast)?;
            writeln!(out, "score:     {}", score.score)?;
            writeln!(out, "recommendation: {}", score.recommendation)?;
            writeln!(out, "technical signal: {}", technical_signal(&set)?)?;
        }
        Report::Summary => {
            let summary = summarize(series)?;
            writeln!(out, "min close:  {:.2}", summary.min_close)?;
            writeln!(out, "max close:  {:.2}", summary.max_close)?;
            writeln!(out, "last close: {:.2}", summary.last_close)?;
            match summary.trend {
                Some(trend) => writeln!(out, "trend:      {}", trend)?,
                None => writeln!(out, "trend:      - (not enough history)")?,
            }
        }
        Report::Project { horizon_days } => {
            for point in project_sma(series, horizon_days, DEFAULT_PROJECTION_WINDOW)? {
                writeln!(out, "{} {:.4}", point.date, point.close)?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn run_validate(config_path: &Path, out: &mut dyn Write) -> Result<(), PricescopeError> {
    let adapter = load_config(config_path)?;
    validate_analysis_config(&adapter)?;
    let config = build_analysis_config(&adapter)?;
    StaticForecastProvider::from_config(&adapter)?;

    writeln!(out, "period:      {}", config.period)?;
    writeln!(
        out,
        "indicators:  RSI({}) MACD({},{},{}) SMA({}) SMA({})",
        config.indicators.rsi_window,
        config.indicators.macd_fast,
        config.indicators.macd_slow,
        config.indicators.macd_signal,
        config.indicators.ma_short_window,
        config.indicators.ma_long_window
    )?;
    writeln!(
        out,
        "range:       {} days at {}",
        config.horizon_days, config.confidence
    )?;
    if adapter.get_string("assets", "tickers").is_some() {
        let watchlist = resolve_tickers(None, &adapter)?;
        writeln!(out, "tickers:     {}", watchlist.tickers().join(", "))?;
    }
    writeln!(out, "configuration is valid")?;
    Ok(())
}

fn run_list_tickers(config_path: &Path, out: &mut dyn Write) -> Result<(), PricescopeError> {
    let adapter = load_config(config_path)?;
    let data = CsvAdapter::new(data_path(&adapter, config_path)?);
    let tickers = data.list_tickers()?;
    if tickers.is_empty() {
        tracing::warn!("no ticker files found");
    }
    for ticker in &tickers {
        writeln!(out, "{}", ticker)?;
    }
    tracing::info!("{} tickers found", tickers.len());
    Ok(())
}
