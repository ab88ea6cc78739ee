//! FFT-based spectral analysis of uniformly sampled series.

use crate::analyzer::Analyzer;
use crate::error::{AnalyzerError, Result};
use crate::plot;
use crate::utils::mean;
use rustfft::{num_complex::Complex64, FftPlanner};
use std::path::Path;

/// One-sided amplitude spectrum of a uniformly sampled series.
#[derive(Debug, Clone)]
pub struct SpectrumResult {
    /// Frequency of each bin, ascending from 0 to the Nyquist frequency.
    /// Bin k corresponds to `k * sampling_rate / n`.
    pub frequencies: Vec<f64>,
    /// Amplitude `|X[k]| / n` of each bin.
    pub magnitudes: Vec<f64>,
    /// Frequency of the strongest bin, excluding DC.
    pub peak_frequency: f64,
    /// Amplitude at the peak bin.
    pub peak_magnitude: f64,
    /// Period implied by the peak frequency, `None` when the peak is at 0 Hz.
    pub period: Option<f64>,
}

impl SpectrumResult {
    /// Ordered `(frequency, magnitude)` pairs.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitudes.iter().copied())
    }

    /// Number of spectrum bins, `floor(n / 2) + 1` for input length n.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether the spectrum is empty (never the case for a computed result).
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Spectral analyzer for a uniformly sampled series.
///
/// The input is mean-centered before the transform, so the DC bin carries
/// no offset energy. Only the non-negative half of the spectrum is kept.
///
/// # Example
///
/// ```
/// use tsanalyzer::prelude::*;
///
/// let samples: Vec<f64> = (0..256)
///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 16.0).sin())
///     .collect();
/// let mut analyzer = SpectralAnalyzer::new(samples, 1.0);
/// analyzer.compute().unwrap();
/// let spectrum = analyzer.result().unwrap();
/// assert!((spectrum.peak_frequency - 1.0 / 16.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SpectralAnalyzer {
    samples: Vec<f64>,
    sampling_rate: f64,
    result: Option<SpectrumResult>,
}

impl SpectralAnalyzer {
    /// Create an analyzer for `samples` taken at `sampling_rate` samples
    /// per unit time.
    pub fn new(samples: Vec<f64>, sampling_rate: f64) -> Self {
        Self {
            samples,
            sampling_rate,
            result: None,
        }
    }

    /// The input series.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The sampling rate in samples per unit time.
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    fn validate(&self) -> Result<()> {
        if self.samples.len() < 2 {
            return Err(AnalyzerError::InvalidInput(format!(
                "need at least 2 samples, got {}",
                self.samples.len()
            )));
        }
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(AnalyzerError::InvalidInput(format!(
                "sampling rate must be positive, got {}",
                self.sampling_rate
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

impl Analyzer for SpectralAnalyzer {
    type Output = SpectrumResult;

    fn compute(&mut self) -> Result<()> {
        self.validate()?;

        let n = self.samples.len();
        let m = mean(&self.samples);

        let mut buffer: Vec<Complex64> = self
            .samples
            .iter()
            .map(|&x| Complex64::new(x - m, 0.0))
            .collect();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        // One-sided spectrum: bins 0..=n/2, amplitude-normalized by n.
        let half = n / 2 + 1;
        let scale = 1.0 / n as f64;
        let magnitudes: Vec<f64> = buffer[..half].iter().map(|c| c.norm() * scale).collect();
        let frequencies: Vec<f64> = (0..half)
            .map(|k| k as f64 * self.sampling_rate / n as f64)
            .collect();

        // Peak search skips the DC bin.
        let peak_idx = magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let peak_frequency = frequencies[peak_idx];
        let peak_magnitude = magnitudes[peak_idx];
        let period = if peak_frequency > 0.0 {
            Some(1.0 / peak_frequency)
        } else {
            None
        };

        self.result = Some(SpectrumResult {
            frequencies,
            magnitudes,
            peak_frequency,
            peak_magnitude,
            period,
        });
        Ok(())
    }

    fn result(&self) -> Result<&SpectrumResult> {
        self.result.as_ref().ok_or(AnalyzerError::NotComputed)
    }

    fn plot(&self, path: &Path) -> Result<()> {
        let result = self.result()?;
        plot::spectrum(path, &self.samples, result)
    }
}
