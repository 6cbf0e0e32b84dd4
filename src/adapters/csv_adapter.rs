//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume`.

use crate::domain::error::SignalsimError;
use crate::domain::price::PriceBar;
use crate::domain::universe::validate_symbol;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

const EXTENSION: &str = "csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

impl From<CsvRow> for PriceBar {
    fn from(row: CsvRow) -> Self {
        PriceBar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> Result<PathBuf, SignalsimError> {
        validate_symbol(symbol).map_err(|e| SignalsimError::Data {
            reason: e.to_string(),
        })?;
        Ok(self.base_path.join(format!("{symbol}.{EXTENSION}")))
    }

    /// Every bar in the symbol's file, sorted by date, duplicates rejected.
    fn read_all(&self, symbol: &str) -> Result<Vec<PriceBar>, SignalsimError> {
        let path = self.csv_path(symbol)?;
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SignalsimError::NoData {
                symbol: symbol.to_string(),
            },
            _ => SignalsimError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();
        for result in rdr.deserialize::<CsvRow>() {
            let row = result.map_err(|e| SignalsimError::Data {
                reason: format!("{}: {}", path.display(), e),
            })?;
            bars.push(PriceBar::from(row));
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SignalsimError::Data {
                reason: format!("{}: duplicate date {}", path.display(), pair[0].date),
            });
        }

        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded price file");
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalsimError> {
        let mut bars = self.read_all(symbol)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalsimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalsimError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SignalsimError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalsimError> {
        let bars = match self.read_all(symbol) {
            Ok(bars) => bars,
            Err(SignalsimError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
