//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(short) - EMA(long)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All EMAs are seeded by their first input, so every bar is valid.
//! Default parameters: short=12, long=26, signal=9

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::price::{extract_prices, PriceBar, PriceField};
use crate::domain::strategy::Strategy;

pub fn calculate_macd(
    bars: &[PriceBar],
    field: PriceField,
    short_window: usize,
    long_window: usize,
    signal_window: usize,
) -> IndicatorSeries {
    let strategy = Strategy::Macd {
        short_window,
        long_window,
        signal_window,
    };
    if bars.is_empty() || short_window == 0 || long_window == 0 || signal_window == 0 {
        return IndicatorSeries {
            strategy,
            values: Vec::new(),
        };
    }

    let prices = extract_prices(bars, field);
    let ema_short = ema_values(&prices, short_window);
    let ema_long = ema_values(&prices, long_window);

    let macd_line: Vec<f64> = ema_short
        .iter()
        .zip(&ema_long)
        .map(|(s, l)| s - l)
        .collect();
    let signal_line = ema_values(&macd_line, signal_window);

    let values = bars
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(bar, (&line, &signal))| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Macd {
                line,
                signal,
                histogram: line - signal,
            },
        })
        .collect();

    IndicatorSeries { strategy, values }
}
