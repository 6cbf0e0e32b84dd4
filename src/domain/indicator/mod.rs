//! Indicator engine: indicator series per strategy and their mapping to signals.
//!
//! [`generate_signals`] is the public entry point: it validates its inputs,
//! computes the indicator, classifies every bar and applies the one-bar shift.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod stddev;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::SignalsimError;
use crate::domain::price::{extract_prices, PriceBar, PriceField};
use crate::domain::signal::{shift_signals, Signal};
use crate::domain::strategy::Strategy;
use crate::domain::validation::validate_prices;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Roc(f64),
    Rsi(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub strategy: Strategy,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Classify every bar against its price. Invalid points are always `Hold`.
    pub fn signals(&self, prices: &[f64]) -> Vec<Signal> {
        self.values
            .iter()
            .zip(prices)
            .map(|(point, &price)| {
                if point.valid {
                    point.value.classify(price)
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }
}

impl IndicatorValue {
    /// The raw (unshifted) signal this value gives for the bar's price.
    pub fn classify(&self, price: f64) -> Signal {
        match *self {
            IndicatorValue::Bollinger { upper, lower, .. } => {
                if price < lower {
                    Signal::Buy
                } else if price > upper {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            IndicatorValue::Macd { line, signal, .. } => {
                if line > signal {
                    Signal::Buy
                } else if line < signal {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            IndicatorValue::Roc(roc) => {
                if roc > 0.0 {
                    Signal::Buy
                } else if roc < 0.0 {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            IndicatorValue::Rsi(rsi) => {
                if rsi < RSI_OVERSOLD {
                    Signal::Buy
                } else if rsi > RSI_OVERBOUGHT {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
        }
    }
}

/// Compute the indicator series for `strategy` without validating inputs.
pub fn compute_indicator(bars: &[PriceBar], strategy: &Strategy, field: PriceField) -> IndicatorSeries {
    match *strategy {
        Strategy::Bollinger {
            window,
            num_std_dev,
        } => bollinger::calculate_bollinger(bars, field, window, num_std_dev),
        Strategy::Macd {
            short_window,
            long_window,
            signal_window,
        } => macd::calculate_macd(bars, field, short_window, long_window, signal_window),
        Strategy::Roc { window } => roc::calculate_roc(bars, field, window),
        Strategy::Rsi { window } => rsi::calculate_rsi(bars, field, window),
    }
}

/// Unshifted signals: the signal at position `t` is derived from bar `t`'s price.
pub fn raw_signals(
    bars: &[PriceBar],
    strategy: &Strategy,
    field: PriceField,
) -> Result<Vec<Signal>, SignalsimError> {
    validate_prices(bars, field)?;
    strategy.validate()?;

    let series = compute_indicator(bars, strategy, field);
    let prices = extract_prices(bars, field);
    Ok(series.signals(&prices))
}

/// Actionable signals: [`raw_signals`] shifted right by one bar.
pub fn generate_signals(
    bars: &[PriceBar],
    strategy: &Strategy,
    field: PriceField,
) -> Result<Vec<Signal>, SignalsimError> {
    let signals = shift_signals(&raw_signals(bars, strategy, field)?);
    debug!(
        %strategy,
        bars = signals.len(),
        buys = signals.iter().filter(|s| **s == Signal::Buy).count(),
        sells = signals.iter().filter(|s| **s == Signal::Sell).count(),
        "generated signals"
    );
    Ok(signals)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }
}
