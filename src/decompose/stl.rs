//! Additive seasonal-trend decomposition.

use super::loess_smooth;
use crate::analyzer::Analyzer;
use crate::error::{AnalyzerError, Result};
use crate::plot;
use crate::utils::variance;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Additive decomposition of a series into trend, seasonal, and residual.
///
/// All three components have the input length and satisfy
/// `trend[i] + seasonal[i] + residual[i] == input[i]` at every index.
#[derive(Debug, Clone)]
pub struct DecompositionResult {
    /// Smooth long-term component.
    pub trend: Vec<f64>,
    /// Repeating component with cycle length equal to the period.
    pub seasonal: Vec<f64>,
    /// Input minus trend minus seasonal.
    pub residual: Vec<f64>,
}

impl DecompositionResult {
    /// Seasonal strength in [0, 1]; values near 1 indicate strong seasonality.
    pub fn seasonal_strength(&self) -> f64 {
        let var_residual = variance(&self.residual);
        let seasonal_plus_residual: Vec<f64> = self
            .seasonal
            .iter()
            .zip(self.residual.iter())
            .map(|(s, r)| s + r)
            .collect();
        let var_sr = variance(&seasonal_plus_residual);

        if var_sr < 1e-10 {
            return 0.0;
        }
        (1.0 - var_residual / var_sr).max(0.0)
    }

    /// Trend strength in [0, 1]; values near 1 indicate strong trend.
    pub fn trend_strength(&self) -> f64 {
        let var_residual = variance(&self.residual);
        let trend_plus_residual: Vec<f64> = self
            .trend
            .iter()
            .zip(self.residual.iter())
            .map(|(t, r)| t + r)
            .collect();
        let var_tr = variance(&trend_plus_residual);

        if var_tr < 1e-10 {
            return 0.0;
        }
        (1.0 - var_residual / var_tr).max(0.0)
    }
}

/// Seasonal-trend decomposer for a time-indexed series.
///
/// The trend is extracted with degree-1 LOESS (tricube-weighted local linear
/// regression) and the seasonal component is the detrended series averaged
/// per cycle position, centered, and tiled to the series length. Trend and
/// seasonal estimation alternate for a few passes; an optional robustness
/// stage downweights outliers with bisquare weights.
///
/// # Example
///
/// ```
/// use tsanalyzer::prelude::*;
///
/// let series: Vec<f64> = (0..120)
///     .map(|i| 0.1 * i as f64 + (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
///     .collect();
/// let mut decomposer = StlDecomposer::new(series, 12);
/// decomposer.compute().unwrap();
/// assert!(decomposer.result().unwrap().seasonal_strength() > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct StlDecomposer {
    samples: Vec<f64>,
    timestamps: Option<Vec<DateTime<Utc>>>,
    period: usize,
    trend_span: Option<usize>,
    seasonal_span: Option<usize>,
    passes: usize,
    robust_iterations: usize,
    result: Option<DecompositionResult>,
}

impl StlDecomposer {
    /// Create a decomposer for `samples` with the given seasonal `period`.
    pub fn new(samples: Vec<f64>, period: usize) -> Self {
        Self {
            samples,
            timestamps: None,
            period,
            trend_span: None,
            seasonal_span: None,
            passes: 2,
            robust_iterations: 0,
            result: None,
        }
    }

    /// Attach an explicit time index; must be strictly increasing and have
    /// the sample length. Validated on `compute`.
    pub fn with_timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    /// Set the trend LOESS span (forced odd). Defaults to the Cleveland
    /// formula `1.5 * period / (1 - 1.5 / ns)`.
    pub fn with_trend_span(mut self, span: usize) -> Self {
        self.trend_span = Some(span | 1);
        self
    }

    /// Smooth the averaged seasonal pattern with a LOESS of this span
    /// (forced odd). Defaults to plain cycle averaging.
    pub fn with_seasonal_span(mut self, span: usize) -> Self {
        self.seasonal_span = Some(span | 1);
        self
    }

    /// Set the number of trend/seasonal alternation passes.
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes.max(1);
        self
    }

    /// Enable robust fitting with the default number of reweighting rounds.
    pub fn robust(mut self) -> Self {
        self.robust_iterations = 2;
        self
    }

    /// Set the number of robustness reweighting rounds.
    pub fn with_robust_iterations(mut self, iterations: usize) -> Self {
        self.robust_iterations = iterations;
        self
    }

    /// The input series.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The attached time index, if any.
    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// The seasonal period.
    pub fn period(&self) -> usize {
        self.period
    }

    fn validate(&self) -> Result<()> {
        if self.period <= 1 {
            return Err(AnalyzerError::InvalidInput(format!(
                "period must be greater than 1, got {}",
                self.period
            )));
        }
        if self.samples.len() < 2 * self.period {
            return Err(AnalyzerError::InvalidInput(format!(
                "need at least 2 full cycles ({} samples), got {}",
                2 * self.period,
                self.samples.len()
            )));
        }
        if self.samples.iter().any(|x| !x.is_finite()) {
            return Err(AnalyzerError::InvalidInput(
                "samples contain non-finite values".to_string(),
            ));
        }
        if let Some(ts) = &self.timestamps {
            if ts.len() != self.samples.len() {
                return Err(AnalyzerError::InvalidInput(format!(
                    "timestamp length {} does not match sample length {}",
                    ts.len(),
                    self.samples.len()
                )));
            }
            if ts.windows(2).any(|w| w[0] >= w[1]) {
                return Err(AnalyzerError::InvalidInput(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Default trend span following Cleveland et al. (1990), forced odd.
    fn default_trend_span(&self) -> usize {
        let ns = (self.period | 1) as f64;
        let nt = (1.5 * self.period as f64 / (1.0 - 1.5 / ns)).ceil() as usize;
        nt | 1
    }

    /// Weighted per-position cycle average, centered to zero mean and tiled.
    fn seasonal_component(&self, detrended: &[f64], weights: &[f64]) -> Vec<f64> {
        let n = detrended.len();
        let period = self.period;

        let mut pattern = vec![0.0; period];
        for (pos, slot) in pattern.iter_mut().enumerate() {
            let mut sum = 0.0;
            let mut sum_w = 0.0;
            let mut count = 0usize;
            let mut plain = 0.0;
            let mut i = pos;
            while i < n {
                sum += weights[i] * detrended[i];
                sum_w += weights[i];
                plain += detrended[i];
                count += 1;
                i += period;
            }
            *slot = if sum_w > 1e-10 {
                sum / sum_w
            } else {
                plain / count as f64
            };
        }

        if let Some(span) = self.seasonal_span {
            let ones = vec![1.0; period];
            pattern = loess_smooth(&pattern, span, &ones);
        }

        // Center so the level is carried by the trend.
        let level: f64 = pattern.iter().sum::<f64>() / period as f64;
        (0..n).map(|i| pattern[i % period] - level).collect()
    }
}

/// Bisquare robustness weights from the residual, tuned by 6x the median
/// absolute residual.
fn robustness_weights(residual: &[f64]) -> Vec<f64> {
    let n = residual.len();
    let mut sorted: Vec<f64> = residual.iter().map(|r| r.abs()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let h = 6.0 * median;
    residual
        .iter()
        .map(|r| {
            if h < 1e-10 {
                return 1.0;
            }
            let u = r.abs() / h;
            if u < 1.0 {
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}

impl Analyzer for StlDecomposer {
    type Output = DecompositionResult;

    fn compute(&mut self) -> Result<()> {
        self.validate()?;

        let n = self.samples.len();
        let trend_span = self.trend_span.unwrap_or_else(|| self.default_trend_span());

        let mut weights = vec![1.0; n];
        let mut trend = vec![0.0; n];
        let mut seasonal = vec![0.0; n];

        for round in 0..=self.robust_iterations {
            for _ in 0..self.passes {
                let deseasonalized: Vec<f64> = self
                    .samples
                    .iter()
                    .zip(seasonal.iter())
                    .map(|(y, s)| y - s)
                    .collect();
                trend = loess_smooth(&deseasonalized, trend_span, &weights);

                let detrended: Vec<f64> = self
                    .samples
                    .iter()
                    .zip(trend.iter())
                    .map(|(y, t)| y - t)
                    .collect();
                seasonal = self.seasonal_component(&detrended, &weights);
            }

            if round < self.robust_iterations {
                let residual: Vec<f64> = self
                    .samples
                    .iter()
                    .zip(trend.iter())
                    .zip(seasonal.iter())
                    .map(|((y, t), s)| y - t - s)
                    .collect();
                weights = robustness_weights(&residual);
            }
        }

        // Residual by subtraction keeps the reconstruction identity exact.
        let residual: Vec<f64> = self
            .samples
            .iter()
            .zip(trend.iter())
            .zip(seasonal.iter())
            .map(|((y, t), s)| y - t - s)
            .collect();

        self.result = Some(DecompositionResult {
            trend,
            seasonal,
            residual,
        });
        Ok(())
    }

    fn result(&self) -> Result<&DecompositionResult> {
        self.result.as_ref().ok_or(AnalyzerError::NotComputed)
    }

    fn plot(&self, path: &Path) -> Result<()> {
        let result = self.result()?;
        plot::decomposition(path, &self.samples, result)
    }
}
