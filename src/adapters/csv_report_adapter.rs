//! CSV report adapter implementing ReportPort.
//!
//! Writes the input price columns merged with the portfolio snapshot columns,
//! one row per bar, plus a `<stem>_summary.csv` metric table next to it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SignalsimError;
use crate::domain::metrics::Metrics;
use crate::domain::price::PriceBar;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// `bld/AAPL_macd.csv` -> `bld/AAPL_macd_summary.csv`
    pub fn summary_path(output_path: &Path) -> PathBuf {
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        output_path.with_file_name(format!("{stem}_summary.csv"))
    }
}

#[derive(Debug, Serialize)]
struct MergedRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
    price: f64,
    signal: u8,
    shares: u64,
    holdings: f64,
    cash: f64,
    assets: f64,
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    metric: &'a str,
    value: String,
}

fn report_err(path: &Path, e: impl std::fmt::Display) -> SignalsimError {
    SignalsimError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

fn summary_rows<'a>(strategy: &str, metrics: &Metrics) -> Vec<SummaryRow<'a>> {
    let bh = &metrics.buy_and_hold;
    let num = |metric: &'a str, value: f64| SummaryRow {
        metric,
        value: format!("{value:.6}"),
    };
    vec![
        SummaryRow {
            metric: "strategy",
            value: strategy.to_string(),
        },
        num("total_return", metrics.total_return),
        num("annualized_return", metrics.annualized_return),
        num("annualized_volatility", metrics.annualized_volatility),
        num("sharpe_ratio", metrics.sharpe_ratio),
        num("max_drawdown", metrics.max_drawdown),
        SummaryRow {
            metric: "max_drawdown_duration",
            value: metrics.max_drawdown_duration.to_string(),
        },
        SummaryRow {
            metric: "trades",
            value: metrics.trades.to_string(),
        },
        num("buy_and_hold_total_return", bh.total_return),
        num("buy_and_hold_annualized_return", bh.annualized_return),
        num("buy_and_hold_annualized_volatility", bh.annualized_volatility),
    ]
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        bars: &[PriceBar],
        output_path: &str,
    ) -> Result<(), SignalsimError> {
        let path = Path::new(output_path);
        let rows = &result.portfolio.rows;
        if rows.len() != bars.len() {
            return Err(report_err(
                path,
                format!("{} portfolio rows for {} price bars", rows.len(), bars.len()),
            ));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path).map_err(|e| report_err(path, e))?;
        for (bar, row) in bars.iter().zip(rows) {
            if bar.date != row.date {
                return Err(report_err(
                    path,
                    format!("price bar {} does not match portfolio row {}", bar.date, row.date),
                ));
            }
            writer
                .serialize(MergedRow {
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                    price: row.price,
                    signal: row.signal.code(),
                    shares: row.shares,
                    holdings: row.holdings,
                    cash: row.cash,
                    assets: row.assets,
                })
                .map_err(|e| report_err(path, e))?;
        }
        writer.flush()?;

        let summary = Self::summary_path(path);
        let mut writer = csv::Writer::from_path(&summary).map_err(|e| report_err(&summary, e))?;
        for row in summary_rows(&result.strategy.to_string(), &result.metrics) {
            writer.serialize(row).map_err(|e| report_err(&summary, e))?;
        }
        writer.flush()?;

        Ok(())
    }
}
