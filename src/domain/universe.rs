//! Symbol universe for multi-symbol runs.
//!
//! Parses symbol and method lists from configuration and checks that each
//! symbol has data in the requested range.

use crate::domain::error::SignalsimError;
use crate::domain::price::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Universe {
    pub symbols: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.symbols.len()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListError {
    #[error("empty token in list")]
    EmptyToken,

    #[error("duplicate entry: {0}")]
    Duplicate(String),

    #[error("invalid symbol '{0}': must be a plain file stem")]
    InvalidSymbol(String),
}

/// Split a comma-separated list, trimming each token.
pub fn parse_list(input: &str) -> Result<Vec<String>, ListError> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ListError::EmptyToken);
        }
        if !seen.insert(trimmed.to_string()) {
            return Err(ListError::Duplicate(trimmed.to_string()));
        }
        items.push(trimmed.to_string());
    }

    Ok(items)
}

/// Symbols name files under the data directory, so they must not be empty
/// or carry path components.
pub fn validate_symbol(symbol: &str) -> Result<(), ListError> {
    let bad = symbol.is_empty()
        || symbol == "."
        || symbol == ".."
        || symbol.contains(['/', '\\'])
        || symbol.chars().any(char::is_control);
    if bad {
        Err(ListError::InvalidSymbol(symbol.to_string()))
    } else {
        Ok(())
    }
}

/// [`parse_list`] plus [`validate_symbol`] on every token.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, ListError> {
    let symbols = parse_list(input)?;
    for symbol in &symbols {
        validate_symbol(symbol)?;
    }
    Ok(symbols)
}

#[derive(Debug)]
pub struct UniverseValidationResult {
    pub universe: Universe,
    pub skipped: Vec<SkippedSymbol>,
    /// Bars fetched for each kept symbol, so callers never read a file twice.
    pub bars: HashMap<String, Vec<PriceBar>>,
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Keep the symbols with at least one bar in `[start_date, end_date]`.
///
/// Fails only when every symbol was skipped.
pub fn validate_universe(
    data_port: &dyn DataPort,
    symbols: Vec<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<UniverseValidationResult, SignalsimError> {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();
    let mut fetched = HashMap::new();

    for symbol in symbols {
        let reason = match data_port.fetch_prices(&symbol, start_date, end_date) {
            Ok(bars) if !bars.is_empty() => {
                info!(%symbol, bars = bars.len(), "symbol ok");
                fetched.insert(symbol.clone(), bars);
                valid.push(symbol);
                continue;
            }
            Ok(_) => format!("no bars between {start_date} and {end_date}"),
            Err(e) => e.to_string(),
        };
        warn!(%symbol, %reason, "skipping symbol");
        skipped.push(SkippedSymbol { symbol, reason });
    }

    if valid.is_empty() {
        return Err(SignalsimError::NoData {
            symbol: skipped
                .iter()
                .map(|s| s.symbol.as_str())
                .collect::<Vec<_>>()
                .join(","),
        });
    }

    if !skipped.is_empty() {
        info!(
            valid = valid.len(),
            total = valid.len() + skipped.len(),
            "backtesting a subset of the configured symbols"
        );
    }

    Ok(UniverseValidationResult {
        universe: Universe { symbols: valid },
        skipped,
        bars: fetched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeData;

    impl DataPort for FakeData {
        fn fetch_prices(
            &self,
            symbol: &str,
            start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<Vec<PriceBar>, SignalsimError> {
            match symbol {
                "AAA" => Ok(vec![PriceBar {
                    date: start_date,
                    open: 1.0,
                    high: 1.0,
                    low: 1.0,
                    close: 1.0,
                    volume: 1,
                }]),
                "EMPTY" => Ok(Vec::new()),
                _ => Err(SignalsimError::NoData {
                    symbol: symbol.to_string(),
                }),
            }
        }

        fn list_symbols(&self) -> Result<Vec<String>, SignalsimError> {
            Ok(vec!["AAA".into(), "EMPTY".into()])
        }

        fn get_data_range(
            &self,
            _symbol: &str,
        ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalsimError> {
            Ok(None)
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn parse_list_basic() {
        assert_eq!(parse_list("AAPL,MSFT,GOOG").unwrap(), vec!["AAPL", "MSFT", "GOOG"]);
    }

    #[test]
    fn parse_list_trims_whitespace() {
        assert_eq!(parse_list("  macd , rsi ,roc").unwrap(), vec!["macd", "rsi", "roc"]);
    }

    #[test]
    fn parse_list_single() {
        assert_eq!(parse_list("AAPL").unwrap(), vec!["AAPL"]);
    }

    #[test]
    fn parse_list_empty_token() {
        assert_eq!(parse_list("AAPL,,MSFT"), Err(ListError::EmptyToken));
        assert_eq!(parse_list(""), Err(ListError::EmptyToken));
    }

    #[test]
    fn parse_list_duplicate() {
        assert_eq!(
            parse_list("AAPL,MSFT,AAPL"),
            Err(ListError::Duplicate("AAPL".to_string()))
        );
    }

    #[test]
    fn parse_symbols_rejects_path_components() {
        assert_eq!(parse_symbols("AAPL, BRK.B").unwrap(), vec!["AAPL", "BRK.B"]);
        for input in ["../x", "a/b", "a\\b", "..", "AAPL,."] {
            assert!(
                matches!(parse_symbols(input), Err(ListError::InvalidSymbol(_))),
                "{input} accepted"
            );
        }
        assert_eq!(parse_symbols(" , AAPL"), Err(ListError::EmptyToken));
    }

    #[test]
    fn validate_universe_skips_missing() {
        let (start, end) = range();
        let result = validate_universe(
            &FakeData,
            vec!["AAA".into(), "EMPTY".into(), "GONE".into()],
            start,
            end,
        )
        .unwrap();
        assert_eq!(result.universe.symbols, vec!["AAA"]);
        assert_eq!(result.universe.count(), 1);
        assert_eq!(result.skipped.len(), 2);
        assert_eq!(result.skipped[1].symbol, "GONE");
        assert_eq!(result.bars.len(), 1);
        assert_eq!(result.bars["AAA"].len(), 1);
        assert_eq!(result.bars["AAA"][0].date, start);
    }

    #[test]
    fn validate_universe_fails_when_all_skipped() {
        let (start, end) = range();
        let err = validate_universe(&FakeData, vec!["EMPTY".into(), "GONE".into()], start, end)
            .unwrap_err();
        assert!(matches!(err, SignalsimError::NoData { symbol } if symbol == "EMPTY,GONE"));
    }
}
