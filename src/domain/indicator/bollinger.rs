//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: rolling mean over n bars
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: window=20, multiplier=2.0
//! Warmup: first (window-1) bars are invalid.

use crate::domain::indicator::stddev::mean_and_sample_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::price::{extract_prices, PriceBar, PriceField};
use crate::domain::strategy::Strategy;

pub fn calculate_bollinger(
    bars: &[PriceBar],
    field: PriceField,
    window: usize,
    num_std_dev: f64,
) -> IndicatorSeries {
    let prices = extract_prices(bars, field);
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let stats = if window >= 2 && i + 1 >= window {
            mean_and_sample_stddev(&prices[i + 1 - window..=i])
        } else {
            None
        };

        let (valid, value) = match stats {
            Some((middle, stddev)) => (
                true,
                IndicatorValue::Bollinger {
                    upper: middle + num_std_dev * stddev,
                    middle,
                    lower: middle - num_std_dev * stddev,
                },
            ),
            None => (
                false,
                IndicatorValue::Bollinger {
                    upper: 0.0,
                    middle: 0.0,
                    lower: 0.0,
                },
            ),
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value,
        });
    }

    IndicatorSeries {
        strategy: Strategy::Bollinger {
            window,
            num_std_dev,
        },
        values,
    }
}
