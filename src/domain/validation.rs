//! Eager input guards for the public entry points.
//!
//! Every check runs before any indicator or simulation step, so a failing
//! call never leaves partial output behind.

use crate::domain::backtest::TradingConfig;
use crate::domain::error::SignalsimError;
use crate::domain::price::{PriceBar, PriceField};

pub fn validate_prices(bars: &[PriceBar], field: PriceField) -> Result<(), SignalsimError> {
    if bars.is_empty() {
        return Err(SignalsimError::range("prices", "price series is empty"));
    }

    for (i, bar) in bars.iter().enumerate() {
        let price = bar.price(field);
        if price.is_nan() {
            return Err(SignalsimError::InvalidInputType {
                name: format!("{field} price on {}", bar.date),
                expected: "a number".into(),
                found: "NaN".into(),
            });
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(SignalsimError::range(
                "prices",
                format!("{field} price on {} must be finite and positive, got {price}", bar.date),
            ));
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(SignalsimError::range(
                "prices",
                format!(
                    "dates must be strictly increasing ({} follows {})",
                    bar.date,
                    bars[i - 1].date
                ),
            ));
        }
    }
    Ok(())
}

pub fn validate_trading_config(config: &TradingConfig) -> Result<(), SignalsimError> {
    validate_number("initial_cash", config.initial_cash)?;
    if config.initial_cash <= 0.0 || config.initial_cash.is_infinite() {
        return Err(SignalsimError::range(
            "initial_cash",
            format!("must be a positive number, got {}", config.initial_cash),
        ));
    }

    validate_number("cost_rate", config.cost_rate)?;
    if !(0.0..=1.0).contains(&config.cost_rate) {
        return Err(SignalsimError::range(
            "cost_rate",
            format!("must be between 0 and 1, got {}", config.cost_rate),
        ));
    }

    validate_number("trade_pct", config.trade_pct)?;
    if config.trade_pct <= 0.0 || config.trade_pct > 1.0 {
        return Err(SignalsimError::range(
            "trade_pct",
            format!("must be in (0, 1], got {}", config.trade_pct),
        ));
    }
    Ok(())
}

pub fn validate_lengths(prices: usize, signals: usize) -> Result<(), SignalsimError> {
    if prices != signals {
        return Err(SignalsimError::LengthMismatch { prices, signals });
    }
    Ok(())
}

pub fn validate_window(name: &str, value: usize) -> Result<(), SignalsimError> {
    if value <= 1 {
        return Err(SignalsimError::InvalidWindow {
            name: name.to_string(),
            value: value as i64,
        });
    }
    Ok(())
}

pub fn validate_positive(name: &str, value: f64) -> Result<(), SignalsimError> {
    validate_number(name, value)?;
    if value <= 0.0 || value.is_infinite() {
        return Err(SignalsimError::range(
            name,
            format!("must be a positive number, got {value}"),
        ));
    }
    Ok(())
}

fn validate_number(name: &str, value: f64) -> Result<(), SignalsimError> {
    if value.is_nan() {
        return Err(SignalsimError::InvalidInputType {
            name: name.to_string(),
            expected: "a number".into(),
            found: "NaN".into(),
        });
    }
    Ok(())
}
