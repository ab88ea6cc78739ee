//! Multiscale periodicity analysis via the discrete wavelet transform.
//!
//! Decomposes a series with a periodized orthogonal filter bank and ranks
//! the detail levels by energy. Detail level j covers the frequency band
//! `[rate / 2^(j+1), rate / 2^j]`, so the dominant level points at the scale
//! of the strongest oscillation.

use crate::analyzer::Analyzer;
use crate::error::{AnalyzerError, Result};
use crate::plot;
use std::path::Path;

/// Daubechies-4 low-pass decomposition filter (8 taps).
const DB4_LO: [f64; 8] = [
    0.230_377_813_308_855_23,
    0.714_846_570_552_541_5,
    0.630_880_767_929_590_4,
    -0.027_983_769_416_983_85,
    -0.187_034_811_718_881_14,
    0.030_841_381_835_986_965,
    0.032_883_011_666_982_945,
    -0.010_597_401_784_997_278,
];

/// Haar low-pass decomposition filter.
const HAAR_LO: [f64; 2] = [std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2];

/// Orthogonal wavelet family used for the decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wavelet {
    /// Haar wavelet: 2 taps, sharp in time, coarse in frequency.
    Haar,
    /// Daubechies-4 wavelet: 8 taps, smoother band separation.
    #[default]
    Db4,
}

impl Wavelet {
    fn dec_lo(&self) -> &'static [f64] {
        match self {
            Wavelet::Haar => &HAAR_LO,
            Wavelet::Db4 => &DB4_LO,
        }
    }

    /// Quadrature mirror high-pass filter: `hi[m] = (-1)^m lo[L-1-m]`.
    fn dec_hi(&self) -> Vec<f64> {
        let lo = self.dec_lo();
        let l = lo.len();
        (0..l)
            .map(|m| {
                let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
                sign * lo[l - 1 - m]
            })
            .collect()
    }

    fn filter_len(&self) -> usize {
        self.dec_lo().len()
    }
}

/// Scale-energy profile of a wavelet decomposition.
#[derive(Debug, Clone)]
pub struct WaveletResult {
    /// Detail level (1-based, fine to coarse) with the highest energy.
    pub dominant_level: usize,
    /// Sum of squared detail coefficients per level, fine to coarse.
    pub level_energy: Vec<f64>,
    /// Characteristic period `2^level / rate` per level.
    pub period_estimates: Vec<f64>,
}

impl WaveletResult {
    /// Number of decomposition levels.
    pub fn levels(&self) -> usize {
        self.level_energy.len()
    }

    /// Period estimate at the dominant level.
    pub fn dominant_period(&self) -> f64 {
        self.period_estimates[self.dominant_level - 1]
    }
}

/// Internal coefficient pyramid retained for reconstruction.
#[derive(Debug, Clone)]
struct Pyramid {
    /// Detail coefficients, level 1 (finest) first.
    details: Vec<Vec<f64>>,
    /// Approximation coefficients after the deepest level.
    approx: Vec<f64>,
    /// Input length at each forward step, used to undo padding.
    step_lengths: Vec<usize>,
}

/// Wavelet scale-energy analyzer.
#[derive(Debug, Clone)]
pub struct WaveletAnalyzer {
    samples: Vec<f64>,
    wavelet: Wavelet,
    max_level: Option<usize>,
    sampling_rate: f64,
    pyramid: Option<Pyramid>,
    result: Option<WaveletResult>,
}

impl WaveletAnalyzer {
    /// Create an analyzer with the default Db4 wavelet at unit sampling rate.
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            wavelet: Wavelet::default(),
            max_level: None,
            sampling_rate: 1.0,
            pyramid: None,
            result: None,
        }
    }

    /// Select the wavelet family.
    pub fn with_wavelet(mut self, wavelet: Wavelet) -> Self {
        self.wavelet = wavelet;
        self
    }

    /// Cap the decomposition depth.
    pub fn with_max_level(mut self, level: usize) -> Self {
        self.max_level = Some(level);
        self
    }

    /// Set the sampling rate used for period estimates.
    pub fn with_sampling_rate(mut self, rate: f64) -> Self {
        self.sampling_rate = rate;
        self
    }

    /// The input series.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    fn validate(&self) -> Result<()> {
        let min_len = 2 * (self.wavelet.filter_len() - 1);
        if self.samples.len() < min_len.max(2) {
            return Err(AnalyzerError::InvalidInput(format!(
                "need at least {} samples for a {:?} decomposition, got {}",
                min_len.max(2),
                self.wavelet,
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

    /// Deepest level such that the coefficient vectors stay at least as long
    /// as the filter.
    fn decomposition_depth(&self) -> usize {
        let filter_len = self.wavelet.filter_len();
        let mut depth = 0;
        let mut len = self.samples.len();
        while len / 2 >= filter_len.max(2) {
            depth += 1;
            len = (len + 1) / 2;
        }
        let depth = depth.max(1);
        match self.max_level {
            Some(cap) => depth.min(cap.max(1)),
            None => depth,
        }
    }

    /// Rebuild the signal keeping only one detail level.
    ///
    /// The returned series has the input length and contains the band-passed
    /// component captured by `level` (1-based).
    pub fn reconstruct(&self, level: usize) -> Result<Vec<f64>> {
        let pyramid = self.pyramid.as_ref().ok_or(AnalyzerError::NotComputed)?;
        if level == 0 || level > pyramid.details.len() {
            return Err(AnalyzerError::InvalidInput(format!(
                "level {} out of range 1..={}",
                level,
                pyramid.details.len()
            )));
        }

        let lo = self.wavelet.dec_lo();
        let hi = self.wavelet.dec_hi();

        let mut approx = vec![0.0; pyramid.approx.len()];
        let zero_details: Vec<Vec<f64>> = pyramid
            .details
            .iter()
            .enumerate()
            .map(|(i, d)| {
                if i + 1 == level {
                    d.clone()
                } else {
                    vec![0.0; d.len()]
                }
            })
            .collect();

        for (step, detail) in zero_details.iter().enumerate().rev() {
            let out_len = pyramid.step_lengths[step];
            approx = idwt_step(&approx, detail, lo, &hi, out_len);
        }
        Ok(approx)
    }
}

/// One forward step of the periodized transform. Odd inputs are padded by
/// repeating the final sample.
fn dwt_step(input: &[f64], lo: &[f64], hi: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut x = input.to_vec();
    if x.len() % 2 == 1 {
        x.push(*x.last().unwrap_or(&0.0));
    }
    let n = x.len();
    let half = n / 2;

    let mut approx = vec![0.0; half];
    let mut detail = vec![0.0; half];
    for k in 0..half {
        let mut a = 0.0;
        let mut d = 0.0;
        for (m, (&l, &h)) in lo.iter().zip(hi.iter()).enumerate() {
            let idx = (2 * k + m) % n;
            a += l * x[idx];
            d += h * x[idx];
        }
        approx[k] = a;
        detail[k] = d;
    }
    (approx, detail)
}

/// Adjoint of [`dwt_step`]; exact inverse for even `out_len`.
fn idwt_step(approx: &[f64], detail: &[f64], lo: &[f64], hi: &[f64], out_len: usize) -> Vec<f64> {
    let n = 2 * approx.len();
    let mut out = vec![0.0; n];
    for k in 0..approx.len() {
        for (m, (&l, &h)) in lo.iter().zip(hi.iter()).enumerate() {
            let idx = (2 * k + m) % n;
            out[idx] += approx[k] * l + detail[k] * h;
        }
    }
    out.truncate(out_len);
    out
}

impl Analyzer for WaveletAnalyzer {
    type Output = WaveletResult;

    fn compute(&mut self) -> Result<()> {
        self.validate()?;

        let lo = self.wavelet.dec_lo();
        let hi = self.wavelet.dec_hi();
        let depth = self.decomposition_depth();

        let mut details = Vec::with_capacity(depth);
        let mut step_lengths = Vec::with_capacity(depth);
        let mut approx = self.samples.clone();

        for _ in 0..depth {
            step_lengths.push(approx.len());
            let (next, detail) = dwt_step(&approx, lo, &hi);
            details.push(detail);
            approx = next;
        }

        let level_energy: Vec<f64> = details
            .iter()
            .map(|d| d.iter().map(|c| c * c).sum())
            .collect();

        let dominant_level = level_energy
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i + 1)
            .unwrap_or(1);

        let period_estimates: Vec<f64> = (1..=depth)
            .map(|j| 2f64.powi(j as i32) / self.sampling_rate)
            .collect();

        self.pyramid = Some(Pyramid {
            details,
            approx,
            step_lengths,
        });
        self.result = Some(WaveletResult {
            dominant_level,
            level_energy,
            period_estimates,
        });
        Ok(())
    }

    fn result(&self) -> Result<&WaveletResult> {
        self.result.as_ref().ok_or(AnalyzerError::NotComputed)
    }

    fn plot(&self, path: &Path) -> Result<()> {
        let result = self.result()?;
        plot::wavelet_energy(path, result)
    }
}
