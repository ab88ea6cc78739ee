//! Locally weighted regression smoothing primitives.

/// Tricube kernel weight for a normalized distance `u`.
fn tricube(u: f64) -> f64 {
    if u < 1.0 {
        (1.0 - u.powi(3)).powi(3)
    } else {
        0.0
    }
}

/// Degree-1 LOESS smoothing with external robustness weights.
///
/// Fits a tricube-weighted linear regression in a window of roughly `span`
/// points around each index and evaluates the fit there. The regression is
/// centered on the target index, so the smoother reproduces linear signals
/// exactly, including at the boundaries where the window is one-sided.
///
/// `weights` must have the same length as `values`; windows whose weighted
/// design is degenerate (a single effective point) fall back to the
/// weighted mean.
pub(crate) fn loess_smooth(values: &[f64], span: usize, weights: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    debug_assert_eq!(n, weights.len());

    let half = span / 2;
    let max_dist = half as f64 + 1.0;
    let mut out = vec![0.0; n];

    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(n);

        let mut sw = 0.0;
        let mut swx = 0.0;
        let mut swy = 0.0;
        let mut swxx = 0.0;
        let mut swxy = 0.0;

        for j in start..end {
            // Offsets are relative to i so the fit is evaluated at x = 0.
            let x = j as f64 - i as f64;
            let w = tricube(x.abs() / max_dist) * weights[j];
            if w <= 0.0 {
                continue;
            }
            sw += w;
            swx += w * x;
            swy += w * values[j];
            swxx += w * x * x;
            swxy += w * x * values[j];
        }

        if sw <= 0.0 {
            out[i] = values[i];
            continue;
        }

        let denom = sw * swxx - swx * swx;
        out[i] = if denom.abs() > 1e-10 * sw * max_dist * max_dist {
            // Intercept of the weighted least-squares line at x = 0.
            (swy * swxx - swx * swxy) / denom
        } else {
            swy / sw
        };
    }

    out
}
