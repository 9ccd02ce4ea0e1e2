//! Sample covariance.

use log::debug;
use nalgebra::DMatrix;

use crate::error::{MathError, MathResult};

/// Arithmetic mean. Empty input yields `None`.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Unbiased sample covariance of two equally long series (divides by n-1).
pub fn sample_covariance(a: &[f64], b: &[f64]) -> MathResult<f64> {
    if a.len() != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: a.len(),
            cols1: 1,
            rows2: b.len(),
            cols2: 1,
        });
    }
    let n = a.len();
    if n < 2 {
        return Err(MathError::insufficient_data(2, n));
    }
    let (Some(mean_a), Some(mean_b)) = (mean(a), mean(b)) else {
        return Err(MathError::insufficient_data(2, 0));
    };
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum();
    Ok(sum / (n - 1) as f64)
}

/// Covariance matrix of a return matrix (rows = periods, columns = assets).
///
/// Uses the unbiased estimator: Σ = Xcᵀ Xc / (n - 1) with Xc the
/// column-centred returns. The result is exactly symmetric.
pub fn covariance_matrix(returns: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    let (n, k) = returns.shape();
    if n < 2 {
        return Err(MathError::insufficient_data(2, n));
    }
    if k == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if returns.iter().any(|x| !x.is_finite()) {
        return Err(MathError::non_finite("return matrix"));
    }

    let means: Vec<f64> = (0..k).map(|j| returns.column(j).mean()).collect();
    let centred = DMatrix::from_fn(n, k, |t, j| returns[(t, j)] - means[j]);
    let denom = (n - 1) as f64;

    let mut cov = DMatrix::zeros(k, k);
    for i in 0..k {
        for j in i..k {
            let value = centred.column(i).dot(&centred.column(j)) / denom;
            cov[(i, j)] = value;
            cov[(j, i)] = value;
        }
    }

    debug!("covariance matrix computed: {} assets over {} periods", k, n);
    Ok(cov)
}
