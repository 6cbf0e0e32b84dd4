//! ROC (Rate of Change) indicator.
//!
//! A window of n bars spans n-1 price changes:
//! ROC(n)[i] = ((C[i] - C[i-(n-1)]) / C[i-(n-1)]) * 100
//! If C[i-(n-1)] == 0: ROC = 0
//! Warmup: first n-1 bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::price::{PriceBar, PriceField};
use crate::domain::strategy::Strategy;

pub fn calculate_roc(bars: &[PriceBar], field: PriceField, window: usize) -> IndicatorSeries {
    let lag = window.saturating_sub(1);
    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let valid = lag > 0 && i >= lag;

        let value = if valid {
            let prev = bars[i - lag].price(field);
            let curr = bars[i].price(field);

            if prev == 0.0 {
                0.0
            } else {
                ((curr - prev) / prev) * 100.0
            }
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: bars[i].date,
            valid,
            value: IndicatorValue::Roc(value),
        });
    }

    IndicatorSeries {
        strategy: Strategy::Roc { window },
        values,
    }
}
