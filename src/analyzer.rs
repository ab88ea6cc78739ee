//! The shared two-phase analyzer contract.
//!
//! Every analyzer in this crate follows the same lifecycle: construct with
//! input data and parameters, call [`Analyzer::compute`] to derive a result,
//! then query the result or render it with [`Analyzer::plot`]. Accessing the
//! result before a successful compute yields
//! [`AnalyzerError::NotComputed`](crate::error::AnalyzerError::NotComputed).

use crate::error::Result;
use std::path::Path;

/// Common capability set shared by all analyzers.
///
/// Implementations are stateless with respect to each other and hold their
/// input series and result exclusively. `compute` is deterministic for fixed
/// input and may be called repeatedly; each call recomputes the result in
/// full. A failed `compute` leaves any previously computed result untouched.
pub trait Analyzer {
    /// The result type produced by `compute`.
    type Output;

    /// Derive the result from the input series.
    ///
    /// Validates all input constraints before any state change and returns
    /// `InvalidInput` naming the violated constraint when they fail.
    fn compute(&mut self) -> Result<()>;

    /// Borrow the computed result.
    fn result(&self) -> Result<&Self::Output>;

    /// Render the result as a PNG figure at `path`.
    fn plot(&self, path: &Path) -> Result<()>;

    /// Whether a result is available.
    fn is_computed(&self) -> bool {
        self.result().is_ok()
    }
}
