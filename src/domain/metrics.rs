//! Performance metrics and the buy-and-hold benchmark.

use chrono::NaiveDate;

use super::indicator::stddev::mean_and_sample_stddev;
use super::portfolio::Portfolio;

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    /// Longest run of bars spent below a previous peak.
    pub max_drawdown_duration: usize,
    pub trades: usize,
    pub buy_and_hold: Benchmark,
}

/// Whole shares bought with the initial cash on the first bar and never sold.
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    pub shares: u64,
    pub values: Vec<f64>,
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
}

impl Metrics {
    pub fn compute(portfolio: &Portfolio, risk_free_rate: f64) -> Self {
        let assets = portfolio.assets();
        let dates = portfolio.dates();
        let years = span_years(&dates);

        let total_return = total_return(&assets);
        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&assets);

        Metrics {
            total_return,
            annualized_return: annualize_return(total_return, years),
            annualized_volatility: annualized_volatility(&assets, years),
            sharpe_ratio: compute_sharpe(&assets, years, risk_free_rate),
            max_drawdown,
            max_drawdown_duration,
            trades: portfolio.trade_count(),
            buy_and_hold: Benchmark::compute(portfolio, years),
        }
    }
}

impl Benchmark {
    fn compute(portfolio: &Portfolio, years: f64) -> Self {
        let shares = match portfolio.rows.first() {
            Some(first) if first.price > 0.0 => (portfolio.initial_cash / first.price).floor() as u64,
            _ => 0,
        };
        let values: Vec<f64> = portfolio
            .rows
            .iter()
            .map(|r| shares as f64 * r.price)
            .collect();

        let total_return = total_return(&values);
        Benchmark {
            shares,
            total_return,
            annualized_return: annualize_return(total_return, years),
            annualized_volatility: annualized_volatility(&values, years),
            values,
        }
    }
}

fn span_years(dates: &[NaiveDate]) -> f64 {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => (*last - *first).num_days() as f64 / DAYS_PER_YEAR,
        _ => 0.0,
    }
}

fn total_return(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if first > 0.0 => last / first - 1.0,
        _ => 0.0,
    }
}

fn annualize_return(total_return: f64, years: f64) -> f64 {
    if years > 0.0 && total_return.is_finite() && total_return >= -1.0 {
        (1.0 + total_return).powf(1.0 / years) - 1.0
    } else {
        0.0
    }
}

/// Return observations per calendar year, or `None` when the span is empty.
fn bars_per_year(values: &[f64], years: f64) -> Option<f64> {
    if values.len() < 2 || years <= 0.0 {
        return None;
    }
    Some((values.len() - 1) as f64 / years)
}

fn annualized_volatility(values: &[f64], years: f64) -> f64 {
    let Some(per_year) = bars_per_year(values, years) else {
        return 0.0;
    };
    let log_returns: Vec<f64> = values
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 && w[1] > 0.0 {
                (w[1] / w[0]).ln()
            } else {
                0.0
            }
        })
        .collect();

    match mean_and_sample_stddev(&log_returns) {
        Some((_, std)) => std * per_year.sqrt(),
        None => 0.0,
    }
}

fn compute_drawdown(values: &[f64]) -> (f64, usize) {
    let Some(&first) = values.first() else {
        return (0.0, 0);
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for &value in values {
        if value >= peak {
            peak = value;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}

fn compute_sharpe(values: &[f64], years: f64, risk_free_rate: f64) -> f64 {
    let Some(per_year) = bars_per_year(values, years) else {
        return 0.0;
    };

    let returns: Vec<f64> = values
        .windows(2)
        .map(|w| {
            let prev = w[0];
            let curr = w[1];
            if prev > 0.0 {
                (curr - prev) / prev
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let excess_return = mean - risk_free_rate / per_year;
    if stddev > 0.0 {
        (excess_return / stddev) * per_year.sqrt()
    } else {
        0.0
    }
}
