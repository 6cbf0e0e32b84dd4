//! Portfolio simulator: folds the trade executor over a signal series.
//!
//! TradingConfig defines the cash, cost and sizing parameters of a run.

use tracing::{debug, info};

use super::error::SignalsimError;
use super::execution::{execute_trade, Fill};
use super::indicator::generate_signals;
use super::metrics::Metrics;
use super::portfolio::{Portfolio, PortfolioState, SnapshotRow};
use super::price::{PriceBar, PriceField};
use super::signal::Signal;
use super::strategy::Strategy;
use super::validation::{validate_lengths, validate_prices, validate_trading_config};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingConfig {
    pub initial_cash: f64,
    /// Fraction of notional charged on each buy and sell leg.
    pub cost_rate: f64,
    /// Fraction of the previous bar's assets committed to one trade.
    pub trade_pct: f64,
}

/// A finished strategy run: the snapshot table and its summary statistics.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub strategy: Strategy,
    pub portfolio: Portfolio,
    pub metrics: Metrics,
}

/// Replay `signals` against `bars`, one row per bar.
///
/// All inputs are validated before the first bar is processed.
pub fn backtest_signals(
    bars: &[PriceBar],
    signals: &[Signal],
    config: &TradingConfig,
    field: PriceField,
) -> Result<Portfolio, SignalsimError> {
    validate_lengths(bars.len(), signals.len())?;
    validate_prices(bars, field)?;
    validate_trading_config(config)?;

    let mut state = PortfolioState::new(config.initial_cash);
    let mut assets = config.initial_cash;
    let mut portfolio = Portfolio::new(config.initial_cash);

    for (bar, &signal) in bars.iter().zip(signals) {
        let price = bar.price(field);
        let trade_volume = config.trade_pct * assets;
        let result = execute_trade(signal, state, price, trade_volume, config.cost_rate);

        match result.fill {
            Fill::Bought { quantity, cost } => {
                debug!(date = %bar.date, price, quantity, cost, "bought");
            }
            Fill::Sold { quantity, proceeds } => {
                debug!(date = %bar.date, price, quantity, proceeds, "sold");
            }
            Fill::Skipped(reason) => {
                debug!(date = %bar.date, %signal, price, trade_volume, ?reason, "trade skipped");
            }
            Fill::NoTrade => {}
        }

        state = result.state;
        let row = SnapshotRow::new(bar.date, price, signal, state);
        assets = row.assets;
        portfolio.record(row);
    }

    Ok(portfolio)
}

/// [`backtest_signals`] over raw integer signal codes (0 hold, 1 sell, 2 buy).
pub fn backtest_signal_codes(
    bars: &[PriceBar],
    codes: &[i64],
    config: &TradingConfig,
    field: PriceField,
) -> Result<Portfolio, SignalsimError> {
    let signals = Signal::from_codes(codes)?;
    backtest_signals(bars, &signals, config, field)
}

/// Generate shifted signals for `strategy` and simulate them.
pub fn run_strategy(
    bars: &[PriceBar],
    strategy: &Strategy,
    config: &TradingConfig,
    field: PriceField,
    risk_free_rate: f64,
) -> Result<BacktestResult, SignalsimError> {
    validate_trading_config(config)?;
    let signals = generate_signals(bars, strategy, field)?;
    let portfolio = backtest_signals(bars, &signals, config, field)?;
    let metrics = Metrics::compute(&portfolio, risk_free_rate);

    info!(
        %strategy,
        bars = portfolio.len(),
        final_assets = portfolio.final_assets(),
        trades = metrics.trades,
        "backtest complete"
    );

    Ok(BacktestResult {
        strategy: strategy.clone(),
        portfolio,
        metrics,
    })
}
