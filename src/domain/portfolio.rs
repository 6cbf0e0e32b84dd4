//! Portfolio state and the per-bar snapshot table.

use chrono::NaiveDate;

use super::signal::Signal;

/// Cash and whole shares carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares: u64,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        PortfolioState {
            cash: initial_cash,
            shares: 0,
        }
    }

    pub fn holdings(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn assets(&self, price: f64) -> f64 {
        self.cash + self.holdings(price)
    }
}

/// One row of the simulation output, emitted once per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub date: NaiveDate,
    pub price: f64,
    pub signal: Signal,
    pub shares: u64,
    pub holdings: f64,
    pub cash: f64,
    pub assets: f64,
}

impl SnapshotRow {
    pub fn new(date: NaiveDate, price: f64, signal: Signal, state: PortfolioState) -> Self {
        let holdings = state.holdings(price);
        SnapshotRow {
            date,
            price,
            signal,
            shares: state.shares,
            holdings,
            cash: state.cash,
            assets: state.cash + holdings,
        }
    }
}

/// The ordered snapshot table produced by one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub initial_cash: f64,
    pub rows: Vec<SnapshotRow>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Portfolio {
            initial_cash,
            rows: Vec::new(),
        }
    }

    pub fn record(&mut self, row: SnapshotRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn assets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.assets).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn final_assets(&self) -> f64 {
        self.rows
            .last()
            .map(|r| r.assets)
            .unwrap_or(self.initial_cash)
    }

    /// Number of bars whose share count differs from the previous bar.
    /// Row 0 is compared against the flat starting state.
    pub fn trade_count(&self) -> usize {
        let before = std::iter::once(0).chain(self.rows.iter().map(|r| r.shares));
        before
            .zip(&self.rows)
            .filter(|(prev, row)| *prev != row.shares)
            .count()
    }
}
