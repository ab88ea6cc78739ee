//! # tsanalyzer
//!
//! Periodicity analysis for univariate time series.
//!
//! Provides five analyzers sharing a common two-phase contract
//! ([`Analyzer`]): FFT spectral analysis, seasonal-trend decomposition,
//! autocorrelation profiling, Lomb-Scargle periodograms for irregular
//! sampling, and wavelet scale-energy analysis. Each analyzer is
//! constructed with its input series and parameters, derives an immutable
//! result on `compute()`, and can render the result as a figure.
//!
//! ```
//! use tsanalyzer::prelude::*;
//!
//! let series: Vec<f64> = (0..512)
//!     .map(|i| (2.0 * std::f64::consts::PI * 50.0 * i as f64 / 512.0).sin())
//!     .collect();
//!
//! let mut analyzer = SpectralAnalyzer::new(series, 512.0);
//! analyzer.compute()?;
//! let spectrum = analyzer.result()?;
//! assert!((spectrum.peak_frequency - 50.0).abs() < 1.0);
//! # Ok::<(), AnalyzerError>(())
//! ```

pub mod analyzer;
pub mod autocorrelation;
pub mod decompose;
pub mod error;
mod plot;
pub mod spectral;
pub mod utils;
pub mod wavelet;

pub use analyzer::Analyzer;
pub use error::{AnalyzerError, Result};

pub mod prelude {
    pub use crate::analyzer::Analyzer;
    pub use crate::autocorrelation::{AcfResult, AutocorrelationAnalyzer, LjungBoxStat};
    pub use crate::decompose::{DecompositionResult, StlDecomposer};
    pub use crate::error::{AnalyzerError, Result};
    pub use crate::spectral::{
        LombScargleAnalyzer, PeriodogramResult, SpectralAnalyzer, SpectrumResult,
    };
    pub use crate::wavelet::{Wavelet, WaveletAnalyzer, WaveletResult};
}
