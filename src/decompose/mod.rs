//! Seasonal-trend decomposition.
//!
//! Splits a series into an additive trend + seasonal + residual
//! decomposition, with the trend extracted by locally weighted linear
//! regression and the seasonal pattern averaged across cycles.

mod loess;
mod stl;

pub(crate) use loess::loess_smooth;
pub use stl::{DecompositionResult, StlDecomposer};
