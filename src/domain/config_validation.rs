//! Configuration validation and typed access.
//!
//! Validates every config field before a run starts. The `read_*` helpers
//! parse values strictly: text that is not a number is an error, never a
//! silent default.

use crate::domain::backtest::TradingConfig;
use crate::domain::error::SignalsimError;
use crate::domain::price::PriceField;
use crate::domain::strategy::{self, Strategy, StrategyKind};
use crate::domain::universe::{parse_list, parse_symbols};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = "bld";

fn missing(section: &str, key: &str) -> SignalsimError {
    SignalsimError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SignalsimError {
    SignalsimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn present(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn read_f64(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<f64>, SignalsimError> {
    let Some(text) = present(config, section, key) else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(Some(v)),
        _ => Err(SignalsimError::InvalidInputType {
            name: format!("[{section}] {key}"),
            expected: "a number".into(),
            found: text,
        }),
    }
}

pub fn read_i64(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<i64>, SignalsimError> {
    let Some(text) = present(config, section, key) else {
        return Ok(None);
    };
    text.parse::<i64>()
        .map(Some)
        .map_err(|_| SignalsimError::InvalidInputType {
            name: format!("[{section}] {key}"),
            expected: "an integer".into(),
            found: text,
        })
}

/// An integer window greater than 1, or `default` when the key is absent.
pub fn read_window(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SignalsimError> {
    match read_i64(config, section, key)? {
        None => Ok(default),
        Some(v) if v > 1 => usize::try_from(v).map_err(|_| SignalsimError::InvalidWindow {
            name: format!("{section}.{key}"),
            value: v,
        }),
        Some(v) => Err(SignalsimError::InvalidWindow {
            name: format!("{section}.{key}"),
            value: v,
        }),
    }
}

pub fn read_date(config: &dyn ConfigPort, section: &str, key: &str) -> Result<NaiveDate, SignalsimError> {
    let text = present(config, section, key).ok_or_else(|| missing(section, key))?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|_| invalid(section, key, format!("invalid {key} format, expected YYYY-MM-DD")))
}

/// `[data] start_date` and `end_date`, start strictly before end.
pub fn date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), SignalsimError> {
    let start = read_date(config, "data", "start_date")?;
    let end = read_date(config, "data", "end_date")?;
    if start >= end {
        return Err(invalid("data", "start_date", "start_date must be before end_date"));
    }
    Ok((start, end))
}

pub fn data_path(config: &dyn ConfigPort) -> String {
    present(config, "data", "path").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
}

pub fn output_dir(config: &dyn ConfigPort) -> String {
    present(config, "report", "output_dir").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
}

pub fn symbols(config: &dyn ConfigPort) -> Result<Vec<String>, SignalsimError> {
    let text = present(config, "data", "symbols").ok_or_else(|| missing("data", "symbols"))?;
    parse_symbols(&text).map_err(|e| invalid("data", "symbols", e.to_string()))
}

pub fn price_field(config: &dyn ConfigPort) -> Result<PriceField, SignalsimError> {
    match present(config, "data", "price_field") {
        None => Ok(PriceField::default()),
        Some(text) => text
            .parse()
            .map_err(|e: SignalsimError| invalid("data", "price_field", e.to_string())),
    }
}

/// Strategy methods to run; all four when `[strategy] methods` is absent.
pub fn methods(config: &dyn ConfigPort) -> Result<Vec<StrategyKind>, SignalsimError> {
    let Some(text) = present(config, "strategy", "methods") else {
        return Ok(StrategyKind::ALL.to_vec());
    };
    parse_list(&text)
        .map_err(|e| invalid("strategy", "methods", e.to_string()))?
        .iter()
        .map(|m| m.parse::<StrategyKind>())
        .collect()
}

/// Parameters for `kind` from its own section, falling back to the defaults.
pub fn strategy_for(config: &dyn ConfigPort, kind: StrategyKind) -> Result<Strategy, SignalsimError> {
    let section = kind.name();
    let built = match kind {
        StrategyKind::Bollinger => Strategy::Bollinger {
            window: read_window(config, section, "window", strategy::DEFAULT_BOLLINGER_WINDOW)?,
            num_std_dev: read_f64(config, section, "num_std_dev")?
                .unwrap_or(strategy::DEFAULT_NUM_STD_DEV),
        },
        StrategyKind::Macd => Strategy::Macd {
            short_window: read_window(config, section, "short_window", strategy::DEFAULT_MACD_SHORT)?,
            long_window: read_window(config, section, "long_window", strategy::DEFAULT_MACD_LONG)?,
            signal_window: read_window(config, section, "signal_window", strategy::DEFAULT_MACD_SIGNAL)?,
        },
        StrategyKind::Roc => Strategy::Roc {
            window: read_window(config, section, "window", strategy::DEFAULT_ROC_WINDOW)?,
        },
        StrategyKind::Rsi => Strategy::Rsi {
            window: read_window(config, section, "window", strategy::DEFAULT_RSI_WINDOW)?,
        },
    };
    built.validate()?;
    Ok(built)
}

pub fn trading_config(config: &dyn ConfigPort) -> Result<TradingConfig, SignalsimError> {
    let initial_cash =
        read_f64(config, "backtest", "initial_cash")?.ok_or_else(|| missing("backtest", "initial_cash"))?;
    if !(initial_cash > 0.0 && initial_cash.is_finite()) {
        return Err(invalid("backtest", "initial_cash", "initial_cash must be positive"));
    }

    let cost_rate = read_f64(config, "backtest", "cost_rate")?.unwrap_or(0.0);
    if !(0.0..=1.0).contains(&cost_rate) {
        return Err(invalid("backtest", "cost_rate", "cost_rate must be between 0 and 1"));
    }

    let trade_pct = read_f64(config, "backtest", "trade_pct")?.unwrap_or(1.0);
    if trade_pct <= 0.0 || trade_pct > 1.0 {
        return Err(invalid("backtest", "trade_pct", "trade_pct must be in (0, 1]"));
    }

    Ok(TradingConfig {
        initial_cash,
        cost_rate,
        trade_pct,
    })
}

pub fn risk_free_rate(config: &dyn ConfigPort) -> Result<f64, SignalsimError> {
    let value = read_f64(config, "backtest", "risk_free_rate")?.unwrap_or(0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid("backtest", "risk_free_rate", "risk_free_rate must be between 0 and 1"));
    }
    Ok(value)
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SignalsimError> {
    symbols(config)?;
    date_range(config)?;
    price_field(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SignalsimError> {
    trading_config(config)?;
    risk_free_rate(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SignalsimError> {
    for kind in methods(config)? {
        strategy_for(config, kind)?;
    }
    Ok(())
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SignalsimError> {
    validate_data_config(config)?;
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;
    Ok(())
}
