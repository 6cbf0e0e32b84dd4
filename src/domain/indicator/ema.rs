//! Exponential Moving Average.
//!
//! alpha = 2/(span+1), seeded with the first value, then
//! EMA[i] = EMA[i-1] + alpha * (x[i] - EMA[i-1]).
//! Every position is defined; there is no warmup.

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA of `values` with the given span. Empty input or `span == 0` gives an empty vector.
pub fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let alpha = smoothing_factor(span);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);

    for &x in &values[1..] {
        // Incremental form keeps a constant input exactly constant.
        ema += alpha * (x - ema);
        out.push(ema);
    }
    out
}
