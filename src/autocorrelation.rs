//! Lag-based self-similarity analysis.
//!
//! Computes the autocorrelation profile of a series for lags 0..=max_lag,
//! the dominant lag, lags significant against the white-noise bound, and
//! optionally Ljung-Box portmanteau statistics per lag.

use crate::analyzer::Analyzer;
use crate::error::{AnalyzerError, Result};
use crate::plot;
use crate::utils::pearson;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::path::Path;

/// Ljung-Box Q statistic and p-value at one lag.
#[derive(Debug, Clone, PartialEq)]
pub struct LjungBoxStat {
    /// Number of lags included in the statistic.
    pub lag: usize,
    /// The Q statistic.
    pub statistic: f64,
    /// Chi-squared survival p-value with `lag` degrees of freedom.
    pub p_value: f64,
}

/// Autocorrelation profile of a series.
#[derive(Debug, Clone)]
pub struct AcfResult {
    /// Correlation at each lag 0..=max_lag; index 0 is exactly 1.0.
    pub correlations: Vec<f64>,
    /// Lag >= 1 with the highest correlation.
    pub peak_lag: usize,
    /// Correlation at the peak lag.
    pub peak_strength: f64,
    /// White-noise significance bound `1.96 / sqrt(n)`.
    pub significance_bound: f64,
    /// Local ACF maxima above the significance bound, as `(lag, correlation)`.
    pub significant_lags: Vec<(usize, f64)>,
    /// Ljung-Box statistics per lag, when requested.
    pub ljung_box: Option<Vec<LjungBoxStat>>,
}

impl AcfResult {
    /// Ordered `(lag, correlation)` pairs.
    pub fn values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.correlations.iter().copied().enumerate()
    }

    /// Highest lag in the profile.
    pub fn max_lag(&self) -> usize {
        self.correlations.len() - 1
    }
}

/// Autocorrelation analyzer.
///
/// For each lag k the correlation is the Pearson coefficient between
/// `x[k..]` and `x[..n-k]`, each side centered by its own mean over the
/// overlapping portion.
///
/// # Example
///
/// ```
/// use tsanalyzer::prelude::*;
///
/// let series: Vec<f64> = (0..200)
///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 20.0).sin()
///         + 0.1 * (((i * 7 + 3) % 13) as f64 - 6.0) / 6.0)
///     .collect();
/// let mut analyzer = AutocorrelationAnalyzer::new(series, 60);
/// analyzer.compute().unwrap();
/// let acf = analyzer.result().unwrap();
/// assert_eq!(acf.correlations[0], 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AutocorrelationAnalyzer {
    samples: Vec<f64>,
    max_lag: usize,
    ljung_box: bool,
    result: Option<AcfResult>,
}

impl AutocorrelationAnalyzer {
    /// Create an analyzer computing lags 0..=max_lag.
    pub fn new(samples: Vec<f64>, max_lag: usize) -> Self {
        Self {
            samples,
            max_lag,
            ljung_box: false,
            result: None,
        }
    }

    /// Also compute Ljung-Box Q statistics and p-values per lag.
    pub fn with_ljung_box(mut self) -> Self {
        self.ljung_box = true;
        self
    }

    /// The input series.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The maximum lag.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    fn validate(&self) -> Result<()> {
        if self.max_lag == 0 {
            return Err(AnalyzerError::InvalidInput(
                "maximum lag must be at least 1".to_string(),
            ));
        }
        if self.max_lag >= self.samples.len() {
            return Err(AnalyzerError::InvalidInput(format!(
                "maximum lag {} must be less than the series length {}",
                self.max_lag,
                self.samples.len()
            )));
        }
        if self.samples.iter().any(|x| !x.is_finite()) {
            return Err(AnalyzerError::InvalidInput(
                "samples contain non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

/// Chi-squared survival function; NaN when the distribution is degenerate.
fn chi_squared_sf(x: f64, df: usize) -> f64 {
    match ChiSquared::new(df as f64) {
        Ok(dist) => 1.0 - dist.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// Ljung-Box Q statistics for lags 1..=max_lag from an ACF profile.
fn ljung_box_stats(correlations: &[f64], n: usize) -> Vec<LjungBoxStat> {
    let mut stats = Vec::with_capacity(correlations.len().saturating_sub(1));
    let mut partial = 0.0;
    for (k, &r) in correlations.iter().enumerate().skip(1) {
        partial += r * r / (n - k) as f64;
        let q = n as f64 * (n as f64 + 2.0) * partial;
        stats.push(LjungBoxStat {
            lag: k,
            statistic: q,
            p_value: chi_squared_sf(q, k),
        });
    }
    stats
}

impl Analyzer for AutocorrelationAnalyzer {
    type Output = AcfResult;

    fn compute(&mut self) -> Result<()> {
        self.validate()?;

        let n = self.samples.len();
        let mut correlations = Vec::with_capacity(self.max_lag + 1);
        correlations.push(1.0);
        for k in 1..=self.max_lag {
            let r = pearson(&self.samples[k..], &self.samples[..n - k]);
            correlations.push(r.clamp(-1.0, 1.0));
        }

        let (peak_lag, peak_strength) = correlations
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(k, &r)| (k, r))
            .unwrap_or((1, correlations[1]));

        let significance_bound = 1.96 / (n as f64).sqrt();

        // Local maxima of the profile above the white-noise bound.
        let mut significant_lags = Vec::new();
        for k in 1..=self.max_lag {
            let left = if k == 1 { f64::NEG_INFINITY } else { correlations[k - 1] };
            let right = if k == self.max_lag {
                f64::NEG_INFINITY
            } else {
                correlations[k + 1]
            };
            let r = correlations[k];
            if r > left && r >= right && r > significance_bound {
                significant_lags.push((k, r));
            }
        }

        let ljung_box = if self.ljung_box {
            Some(ljung_box_stats(&correlations, n))
        } else {
            None
        };

        self.result = Some(AcfResult {
            correlations,
            peak_lag,
            peak_strength,
            significance_bound,
            significant_lags,
            ljung_box,
        });
        Ok(())
    }

    fn result(&self) -> Result<&AcfResult> {
        self.result.as_ref().ok_or(AnalyzerError::NotComputed)
    }

    fn plot(&self, path: &Path) -> Result<()> {
        let result = self.result()?;
        plot::acf(path, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Sine with small deterministic jitter so peaks at lag multiples decay.
    fn noisy_sine(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                    + 0.2 * ((((i * 7 + 3) % 13) as f64 - 6.0) / 6.0)
            })
            .collect()
    }

    #[test]
    fn lag_zero_is_exactly_one() {
        let mut analyzer = AutocorrelationAnalyzer::new(noisy_sine(100, 10), 30);
        analyzer.compute().unwrap();
        assert_eq!(analyzer.result().unwrap().correlations[0], 1.0);
    }

    #[test]
    fn all_values_within_unit_interval() {
        let mut analyzer = AutocorrelationAnalyzer::new(noisy_sine(200, 17), 120);
        analyzer.compute().unwrap();
        for (_, r) in analyzer.result().unwrap().values() {
            assert!((-1.0..=1.0).contains(&r), "correlation out of range: {}", r);
        }
    }

    #[test]
    fn periodic_series_peaks_at_a_period_multiple() {
        let mut analyzer = AutocorrelationAnalyzer::new(noisy_sine(300, 25), 100);
        analyzer.compute().unwrap();

        // Pearson-on-overlap does not decay with lag, so every multiple of
        // the period is an equally strong candidate.
        let result = analyzer.result().unwrap();
        assert!(
            [25usize, 50, 75, 100]
                .iter()
                .any(|t| result.peak_lag.abs_diff(*t) <= 2),
            "expected peak near a multiple of 25, got {}",
            result.peak_lag
        );
        assert!(result.peak_strength > 0.5);
    }

    #[test]
    fn significant_lags_cover_period_multiples() {
        let mut analyzer = AutocorrelationAnalyzer::new(noisy_sine(300, 25), 100);
        analyzer.compute().unwrap();

        let result = analyzer.result().unwrap();
        let lags: Vec<usize> = result.significant_lags.iter().map(|(k, _)| *k).collect();
        for target in [25usize, 50, 75] {
            assert!(
                lags.iter().any(|&k| k.abs_diff(target) <= 2),
                "expected a significant lag near {}, got {:?}",
                target,
                lags
            );
        }
    }

    #[test]
    fn alternating_series_has_negative_lag_one() {
        let series: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let mut analyzer = AutocorrelationAnalyzer::new(series, 4);
        analyzer.compute().unwrap();
        assert!(analyzer.result().unwrap().correlations[1] < -0.9);
    }

    #[test]
    fn constant_overlap_yields_zero_correlation() {
        let mut series = vec![5.0; 40];
        series[0] = 1.0; // non-constant overall, constant in most overlaps
        let mut analyzer = AutocorrelationAnalyzer::new(series, 4);
        analyzer.compute().unwrap();
        // x[2..] vs x[..n-2]: the left side is all 5.0.
        assert_eq!(analyzer.result().unwrap().correlations[2], 0.0);
    }

    #[test]
    fn ljung_box_flags_autocorrelated_series() {
        let mut analyzer = AutocorrelationAnalyzer::new(noisy_sine(200, 20), 20).with_ljung_box();
        analyzer.compute().unwrap();

        let stats = analyzer.result().unwrap().ljung_box.as_ref().unwrap();
        assert_eq!(stats.len(), 20);
        assert_eq!(stats[0].lag, 1);
        // A strongly periodic series is decisively non-white.
        assert!(stats.last().unwrap().p_value < 0.01);
        for s in stats {
            assert!(s.statistic >= 0.0);
            assert!((0.0..=1.0).contains(&s.p_value));
        }
    }

    #[test]
    fn ljung_box_absent_unless_requested() {
        let mut analyzer = AutocorrelationAnalyzer::new(noisy_sine(100, 10), 20);
        analyzer.compute().unwrap();
        assert!(analyzer.result().unwrap().ljung_box.is_none());
    }

    #[test]
    fn rejects_zero_max_lag() {
        let mut analyzer = AutocorrelationAnalyzer::new(vec![1.0, 2.0, 3.0], 0);
        assert!(matches!(
            analyzer.compute(),
            Err(AnalyzerError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_max_lag_at_or_beyond_length() {
        for max_lag in [10, 11] {
            let series: Vec<f64> = (0..10).map(|i| i as f64).collect();
            let mut analyzer = AutocorrelationAnalyzer::new(series, max_lag);
            assert!(matches!(
                analyzer.compute(),
                Err(AnalyzerError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn result_before_compute_is_not_computed() {
        let analyzer = AutocorrelationAnalyzer::new(vec![1.0, 2.0, 3.0], 2);
        assert_eq!(analyzer.result().unwrap_err(), AnalyzerError::NotComputed);
    }

    #[test]
    fn significance_bound_matches_length() {
        let mut analyzer = AutocorrelationAnalyzer::new(noisy_sine(400, 10), 50);
        analyzer.compute().unwrap();
        assert_relative_eq!(
            analyzer.result().unwrap().significance_bound,
            1.96 / 20.0,
            epsilon = 1e-12
        );
    }
}
