//! Price bar representation.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::SignalsimError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Which column of a bar feeds the indicators and the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl PriceBar {
    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }
}

/// Project one column of the series into a plain vector, position-aligned with `bars`.
pub fn extract_prices(bars: &[PriceBar], field: PriceField) -> Vec<f64> {
    bars.iter().map(|b| b.price(field)).collect()
}

impl FromStr for PriceField {
    type Err = SignalsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            other => Err(SignalsimError::InvalidInputType {
                name: "price_field".into(),
                expected: "one of open, high, low, close".into(),
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
        };
        f.write_str(name)
    }
}
