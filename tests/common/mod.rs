#![allow(dead_code)]

use chrono::NaiveDate;
use signalsim::domain::backtest::TradingConfig;
use signalsim::domain::error::SignalsimError;
pub use signalsim::domain::price::PriceBar;
use signalsim::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalsimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalsimError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalsimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalsimError> {
        Ok(self.data.get(symbol).and_then(|bars| {
            Some((bars.first()?.date, bars.last()?.date, bars.len()))
        }))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 10_000,
    }
}

/// Daily bars starting at `start`, one per price.
pub fn bars_from_prices(start: NaiveDate, prices: &[f64]) -> Vec<PriceBar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10_000,
        })
        .collect()
}

/// A deterministic oscillating series around `base`, always positive.
pub fn generate_bars(start: NaiveDate, count: usize, base: f64) -> Vec<PriceBar> {
    let prices: Vec<f64> = (0..count)
        .map(|i| {
            let t = i as f64;
            base + (t * 0.35).sin() * base * 0.08 + (t * 0.05) * base * 0.01
        })
        .collect();
    bars_from_prices(start, &prices)
}

pub fn sample_config() -> TradingConfig {
    TradingConfig {
        initial_cash: 10_000.0,
        cost_rate: 0.001,
        trade_pct: 0.5,
    }
}

/// Write `<dir>/<symbol>.csv` in the adapter's format.
pub fn write_price_csv(dir: &Path, symbol: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
