//! Parallel execution of independent (symbol, strategy) runs.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::warn;

use super::backtest::{run_strategy, BacktestResult, TradingConfig};
use super::error::SignalsimError;
use super::price::{PriceBar, PriceField};
use super::strategy::Strategy;

/// One self-contained simulation. Jobs for the same symbol share their bars.
#[derive(Debug, Clone)]
pub struct BacktestJob {
    pub symbol: String,
    pub strategy: Strategy,
    pub bars: Arc<[PriceBar]>,
    pub config: TradingConfig,
    pub field: PriceField,
    pub risk_free_rate: f64,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub symbol: String,
    pub strategy: Strategy,
    pub result: Result<BacktestResult, SignalsimError>,
}

impl BacktestJob {
    pub fn run(&self) -> Result<BacktestResult, SignalsimError> {
        run_strategy(
            &self.bars,
            &self.strategy,
            &self.config,
            self.field,
            self.risk_free_rate,
        )
    }
}

/// Run every job on the rayon pool. Outcomes are returned in job order and a
/// failing job does not affect the others.
pub fn run_batch(jobs: Vec<BacktestJob>) -> Vec<BatchOutcome> {
    jobs.into_par_iter()
        .map(|job| {
            let result = job.run();
            if let Err(e) = &result {
                warn!(symbol = %job.symbol, strategy = %job.strategy, error = %e, "backtest failed");
            }
            BatchOutcome {
                symbol: job.symbol,
                strategy: job.strategy,
                result,
            }
        })
        .collect()
}
