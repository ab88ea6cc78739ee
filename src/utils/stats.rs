//! Basic statistics over f64 slices.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator). Returns 0.0 for fewer than 2 values.
pub fn variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Pearson correlation coefficient between two equal-length slices.
///
/// Each side is centered by its own mean. Returns 0.0 when either side has
/// zero variance, and `NaN` on a length mismatch or empty input.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return f64::NAN;
    }

    let mx = mean(x);
    let my = mean(y);

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;

    for (&a, &b) in x.iter().zip(y.iter()) {
        let da = a - mx;
        let db = b - my;
        num += da * db;
        den_x += da * da;
        den_y += db * db;
    }

    let denom = (den_x * den_y).sqrt();
    if denom < 1e-12 {
        return 0.0;
    }

    num / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_simple() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn variance_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(variance(&values), 4.571428571428571, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&values), 4.571428571428571_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(variance(&[1.0]), 0.0);
    }

    #[test]
    fn pearson_perfect_correlation() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-12);

        let neg: Vec<f64> = x.iter().map(|v| -v).collect();
        assert_relative_eq!(pearson(&x, &neg), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_constant_side_is_zero() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y = vec![5.0; 10];
        assert_eq!(pearson(&x, &y), 0.0);
    }

    #[test]
    fn pearson_mismatched_lengths() {
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_nan());
        assert!(pearson(&[], &[]).is_nan());
    }
}
