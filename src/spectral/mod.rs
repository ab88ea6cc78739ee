//! Frequency-domain periodicity analysis.
//!
//! - [`SpectralAnalyzer`]: one-sided FFT amplitude spectrum for uniformly
//!   sampled series
//! - [`LombScargleAnalyzer`]: Lomb-Scargle periodogram for irregularly
//!   sampled series

mod fft;
mod lomb;

pub use fft::{SpectralAnalyzer, SpectrumResult};
pub use lomb::{LombScargleAnalyzer, PeriodogramResult};
