//! Sample mean and standard deviation helpers.
//!
//! Standard deviation here is the sample estimate (divides by n-1), the same
//! estimator used for rolling bands and return volatility.

/// Mean and sample standard deviation of `values`.
///
/// Returns `None` for fewer than two values, where the sample estimate is undefined.
pub fn mean_and_sample_stddev(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;

    Some((mean, variance.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_values_zero_stddev() {
        let (mean, sd) = mean_and_sample_stddev(&[100.0; 5]).unwrap();
        assert_eq!(mean, 100.0);
        assert_eq!(sd, 0.0);
    }

    #[test]
    fn known_values() {
        // mean 20, squared deviations 100 + 0 + 100, divided by n-1 = 2
        let (mean, sd) = mean_and_sample_stddev(&[10.0, 20.0, 30.0]).unwrap();
        assert_relative_eq!(mean, 20.0);
        assert_relative_eq!(sd, 10.0);
    }

    #[test]
    fn undefined_below_two_values() {
        assert!(mean_and_sample_stddev(&[]).is_none());
        assert!(mean_and_sample_stddev(&[3.0]).is_none());
    }
}
