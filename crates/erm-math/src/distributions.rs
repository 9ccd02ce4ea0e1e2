//! Probability distributions.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{MathError, MathResult};

/// Standard-normal quantile: the `z` with `P(Z <= z) = p`.
///
/// `p` must lie strictly between 0 and 1.
pub fn standard_normal_quantile(p: f64) -> MathResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(MathError::invalid_input(format!(
            "probability must be in (0, 1), got {p}"
        )));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| MathError::invalid_input(e.to_string()))?;
    Ok(normal.inverse_cdf(p))
}
