//! Lomb-Scargle periodogram for irregularly sampled series.

use crate::analyzer::Analyzer;
use crate::error::{AnalyzerError, Result};
use crate::plot;
use crate::utils::mean;
use std::path::Path;

/// Lomb-Scargle power spectrum over a fixed frequency grid.
#[derive(Debug, Clone)]
pub struct PeriodogramResult {
    /// Evaluated frequencies, ascending.
    pub frequencies: Vec<f64>,
    /// Lomb-Scargle power at each frequency.
    pub power: Vec<f64>,
    /// Frequency with the highest power.
    pub peak_frequency: f64,
    /// Period implied by the peak frequency.
    pub period: Option<f64>,
}

impl PeriodogramResult {
    /// Ordered `(frequency, power)` pairs.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.power.iter().copied())
    }
}

/// Periodicity analyzer for non-uniformly sampled series.
///
/// Evaluates the classic Lomb-Scargle periodogram of the mean-centered
/// values over a linear frequency grid. Unlike
/// [`SpectralAnalyzer`](crate::spectral::SpectralAnalyzer), the sample
/// times may be irregular.
#[derive(Debug, Clone)]
pub struct LombScargleAnalyzer {
    times: Vec<f64>,
    values: Vec<f64>,
    min_freq: f64,
    max_freq: f64,
    resolution: usize,
    result: Option<PeriodogramResult>,
}

impl LombScargleAnalyzer {
    /// Create an analyzer for `values` observed at `times`.
    ///
    /// The default frequency grid spans 0.01 to 1.0 cycles per time unit
    /// with 1000 points.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            times,
            values,
            min_freq: 0.01,
            max_freq: 1.0,
            resolution: 1000,
            result: None,
        }
    }

    /// Set the frequency grid bounds in cycles per time unit.
    pub fn with_frequency_range(mut self, min_freq: f64, max_freq: f64) -> Self {
        self.min_freq = min_freq;
        self.max_freq = max_freq;
        self
    }

    /// Set the number of grid points.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.times.len() != self.values.len() {
            return Err(AnalyzerError::InvalidInput(format!(
                "time and value lengths differ: {} vs {}",
                self.times.len(),
                self.values.len()
            )));
        }
        if self.values.len() < 2 {
            return Err(AnalyzerError::InvalidInput(format!(
                "need at least 2 observations, got {}",
                self.values.len()
            )));
        }
        if !self.min_freq.is_finite() || self.min_freq <= 0.0 {
            return Err(AnalyzerError::InvalidInput(format!(
                "minimum frequency must be positive, got {}",
                self.min_freq
            )));
        }
        if !self.max_freq.is_finite() || self.max_freq <= self.min_freq {
            return Err(AnalyzerError::InvalidInput(format!(
                "maximum frequency must exceed the minimum, got {} <= {}",
                self.max_freq, self.min_freq
            )));
        }
        if self.resolution < 2 {
            return Err(AnalyzerError::InvalidInput(format!(
                "frequency resolution must be at least 2, got {}",
                self.resolution
            )));
        }
        if self
            .times
            .iter()
            .chain(self.values.iter())
            .any(|x| !x.is_finite())
        {
            return Err(AnalyzerError::InvalidInput(
                "times or values contain non-finite values".to_string(),
            ));
        }
        if self.times.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AnalyzerError::InvalidInput(
                "time points must be strictly increasing".to_string(),
            ));
        }
        Ok(())
    }

    /// Lomb-Scargle power at angular frequency `w` for centered values `y`.
    fn power_at(times: &[f64], y: &[f64], w: f64) -> f64 {
        // Time offset tau decouples the sine and cosine terms.
        let (mut s2, mut c2) = (0.0, 0.0);
        for &t in times {
            s2 += (2.0 * w * t).sin();
            c2 += (2.0 * w * t).cos();
        }
        let tau = s2.atan2(c2) / (2.0 * w);

        let (mut yc, mut ys, mut cc, mut ss) = (0.0, 0.0, 0.0, 0.0);
        for (&t, &v) in times.iter().zip(y.iter()) {
            let arg = w * (t - tau);
            let c = arg.cos();
            let s = arg.sin();
            yc += v * c;
            ys += v * s;
            cc += c * c;
            ss += s * s;
        }

        let mut p = 0.0;
        if cc > 1e-12 {
            p += yc * yc / cc;
        }
        if ss > 1e-12 {
            p += ys * ys / ss;
        }
        0.5 * p
    }
}

impl Analyzer for LombScargleAnalyzer {
    type Output = PeriodogramResult;

    fn compute(&mut self) -> Result<()> {
        self.validate()?;

        let m = mean(&self.values);
        let centered: Vec<f64> = self.values.iter().map(|&v| v - m).collect();

        let step = (self.max_freq - self.min_freq) / (self.resolution - 1) as f64;
        let frequencies: Vec<f64> = (0..self.resolution)
            .map(|i| self.min_freq + i as f64 * step)
            .collect();

        let power: Vec<f64> = frequencies
            .iter()
            .map(|&f| Self::power_at(&self.times, &centered, 2.0 * std::f64::consts::PI * f))
            .collect();

        let peak_idx = power
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let peak_frequency = frequencies[peak_idx];
        let period = if peak_frequency > 0.0 {
            Some(1.0 / peak_frequency)
        } else {
            None
        };

        self.result = Some(PeriodogramResult {
            frequencies,
            power,
            peak_frequency,
            period,
        });
        Ok(())
    }

    fn result(&self) -> Result<&PeriodogramResult> {
        self.result.as_ref().ok_or(AnalyzerError::NotComputed)
    }

    fn plot(&self, path: &Path) -> Result<()> {
        let result = self.result()?;
        plot::periodogram(path, result)
    }
}
