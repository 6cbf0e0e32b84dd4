//! RSI (Relative Strength Index) indicator.
//!
//! Average gain/loss is a simple rolling mean over the last `window` bar
//! changes, needing at least one observation. The first bar's change is 0.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100 (the limit as RS -> infinity)
//! If avg_loss == 0 and avg_gain == 0: RSI is undefined and the point is invalid

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::price::{PriceBar, PriceField};
use crate::domain::strategy::Strategy;

/// RSI from average gain and loss, `None` when both are zero.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return None;
        }
        return Some(100.0);
    }
    Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
}

pub fn calculate_rsi(bars: &[PriceBar], field: PriceField, window: usize) -> IndicatorSeries {
    let strategy = Strategy::Rsi { window };
    if window == 0 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                valid: false,
                value: IndicatorValue::Rsi(0.0),
            })
            .collect();
        return IndicatorSeries { strategy, values };
    }

    let mut gains: Vec<f64> = Vec::with_capacity(bars.len());
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        let change = if i == 0 {
            0.0
        } else {
            bars[i].price(field) - bars[i - 1].price(field)
        };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let start = (i + 1).saturating_sub(window);
        let count = (i + 1 - start) as f64;
        let avg_gain = gains[start..=i].iter().sum::<f64>() / count;
        let avg_loss = losses[start..=i].iter().sum::<f64>() / count;

        let (valid, rsi) = match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => (true, rsi),
            None => (false, 0.0),
        };
        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Rsi(rsi),
        });
    }

    IndicatorSeries { strategy, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;
    use crate::domain::indicator::{generate_signals, raw_signals};
    use crate::domain::signal::Signal;
    use approx::assert_relative_eq;

    fn simple(series: &IndicatorSeries, i: usize) -> f64 {
        match series.values[i].value {
            IndicatorValue::Rsi(v) => v,
            _ => panic!("Expected RSI value"),
        }
    }

    #[test]
    fn first_bar_undefined() {
        let bars = make_bars(&[100.0, 101.0]);
        let series = calculate_rsi(&bars, PriceField::Close, 14);
        assert!(!series.values[0].valid);
        assert!(series.values[1].valid);
    }

    #[test]
    fn all_gains_clamps_to_100() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), PriceField::Close, 14);
        for i in 1..15 {
            assert!(series.values[i].valid);
            assert_eq!(simple(&series, i), 100.0);
        }
    }

    #[test]
    fn all_losses_gives_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), PriceField::Close, 14);
        assert_eq!(simple(&series, 14), 0.0);
    }

    #[test]
    fn rolling_mean_over_window() {
        // changes: 0, +2, -1, +3 ; window 3 at bar 3 covers +2, -1, +3
        let bars = make_bars(&[10.0, 12.0, 11.0, 14.0]);
        let series = calculate_rsi(&bars, PriceField::Close, 3);
        let avg_gain = 5.0 / 3.0;
        let avg_loss = 1.0 / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert_relative_eq!(simple(&series, 3), expected, epsilon = 1e-12);
    }

    #[test]
    fn partial_window_uses_available_bars() {
        // bar 1 averages the zero first change and +2
        let bars = make_bars(&[10.0, 12.0, 11.0]);
        let series = calculate_rsi(&bars, PriceField::Close, 14);
        assert_eq!(simple(&series, 1), 100.0);
        // bar 2: gains (0 + 2 + 0) / 3, losses (0 + 0 + 1) / 3 -> RS = 2
        assert_relative_eq!(simple(&series, 2), 100.0 - 100.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_prices_all_hold() {
        let bars = make_bars(&[50.0; 20]);
        let strategy = Strategy::Rsi { window: 14 };
        let series = calculate_rsi(&bars, PriceField::Close, 14);
        assert!(series.values.iter().all(|p| !p.valid));
        let signals = generate_signals(&bars, &strategy, PriceField::Close).unwrap();
        assert_eq!(signals, vec![Signal::Hold; 20]);
    }

    #[test]
    fn steady_uptrend_sells_and_downtrend_buys() {
        let up: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let down: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let strategy = Strategy::Rsi { window: 5 };

        let raw_up = raw_signals(&make_bars(&up), &strategy, PriceField::Close).unwrap();
        assert_eq!(raw_up[0], Signal::Hold);
        assert!(raw_up[1..].iter().all(|s| *s == Signal::Sell));

        let raw_down = raw_signals(&make_bars(&down), &strategy, PriceField::Close).unwrap();
        assert!(raw_down[1..].iter().all(|s| *s == Signal::Buy));
    }

    #[test]
    fn values_in_range() {
        let prices: Vec<f64> = (1..=20).map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0).collect();
        let series = calculate_rsi(&make_bars(&prices), PriceField::Close, 14);
        for point in series.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Rsi(rsi) = point.value {
                assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
            }
        }
    }

    #[test]
    fn rsi_from_averages_limits() {
        assert_eq!(rsi_from_averages(0.0, 0.0), None);
        assert_eq!(rsi_from_averages(1.0, 0.0), Some(100.0));
        assert_eq!(rsi_from_averages(0.0, 1.0), Some(0.0));
        assert_eq!(rsi_from_averages(1.0, 1.0), Some(50.0));
    }
}
