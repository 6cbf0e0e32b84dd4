//! Trade execution: the pure per-bar transition of a cash/shares portfolio.
//!
//! Position sizing uses a trade volume computed by the caller
//! (`trade_pct * assets` before the bar). Transaction costs are a fraction of
//! notional charged on every leg: buys pay `price * (1 + cost_rate)` per share,
//! sells receive `price * (1 - cost_rate)` per share.

use super::portfolio::PortfolioState;
use super::signal::Signal;

/// Why a Buy or Sell signal left the portfolio untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The trade volume does not cover a single share.
    BelowOneShare,
    /// The sized order costs more than the cash on hand.
    InsufficientCash,
    /// A sell signal arrived with nothing held.
    NoShares,
}

/// What a bar's signal did to the portfolio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Bought { quantity: u64, cost: f64 },
    Sold { quantity: u64, proceeds: f64 },
    Skipped(SkipReason),
    NoTrade,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeResult {
    pub state: PortfolioState,
    pub fill: Fill,
}

impl TradeResult {
    fn unchanged(state: PortfolioState, fill: Fill) -> Self {
        TradeResult { state, fill }
    }
}

/// Apply one bar's signal.
///
/// Hold is a no-op. Underfunded or undersized orders are skipped, never errors.
pub fn execute_trade(
    signal: Signal,
    state: PortfolioState,
    price: f64,
    trade_volume: f64,
    cost_rate: f64,
) -> TradeResult {
    match signal {
        Signal::Buy => execute_buy(state, price, trade_volume, cost_rate),
        Signal::Sell => execute_sell(state, price, trade_volume, cost_rate),
        Signal::Hold => TradeResult::unchanged(state, Fill::NoTrade),
    }
}

/// Buy `floor(trade_volume / (price * (1 + cost_rate)))` shares if at least one
/// share is sized and the cash covers the cost.
pub fn execute_buy(
    state: PortfolioState,
    price: f64,
    trade_volume: f64,
    cost_rate: f64,
) -> TradeResult {
    let unit_cost = price * (1.0 + cost_rate);
    let quantity = whole_shares(trade_volume / unit_cost);

    if quantity == 0 {
        return TradeResult::unchanged(state, Fill::Skipped(SkipReason::BelowOneShare));
    }

    let cost = quantity as f64 * unit_cost;
    if state.cash < cost {
        return TradeResult::unchanged(state, Fill::Skipped(SkipReason::InsufficientCash));
    }

    TradeResult {
        state: PortfolioState {
            cash: state.cash - cost,
            shares: state.shares + quantity,
        },
        fill: Fill::Bought { quantity, cost },
    }
}

/// Sell `floor(trade_volume / (price * (1 - cost_rate)))` shares, capped at the
/// shares held.
///
/// With `cost_rate == 1` every share nets zero; the whole holding is sold.
pub fn execute_sell(
    state: PortfolioState,
    price: f64,
    trade_volume: f64,
    cost_rate: f64,
) -> TradeResult {
    if state.shares < 1 {
        return TradeResult::unchanged(state, Fill::Skipped(SkipReason::NoShares));
    }

    let unit_proceeds = price * (1.0 - cost_rate);
    let sized = if unit_proceeds > 0.0 {
        whole_shares(trade_volume / unit_proceeds)
    } else {
        state.shares
    };
    let quantity = sized.min(state.shares);

    if quantity == 0 {
        return TradeResult::unchanged(state, Fill::Skipped(SkipReason::BelowOneShare));
    }

    let proceeds = quantity as f64 * unit_proceeds;
    TradeResult {
        state: PortfolioState {
            cash: state.cash + proceeds,
            shares: state.shares - quantity,
        },
        fill: Fill::Sold { quantity, proceeds },
    }
}

/// Floor a non-negative share count. Non-finite or negative input sizes nothing.
fn whole_shares(raw: f64) -> u64 {
    if raw.is_finite() && raw >= 1.0 {
        raw.floor() as u64
    } else {
        0
    }
}
