//! Linear algebra utilities.
//!
//! Matrix-vector products and the sanity checks a covariance matrix must
//! pass before it is used for portfolio variance.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Relative tolerance for the symmetry check.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Relative tolerance below zero for the smallest eigenvalue.
const EIGEN_TOLERANCE: f64 = 1e-12;

/// Computes `M v`.
pub fn mat_vec(matrix: &DMatrix<f64>, v: &[f64]) -> MathResult<DVector<f64>> {
    if matrix.ncols() != v.len() {
        return Err(MathError::DimensionMismatch {
            rows1: matrix.nrows(),
            cols1: matrix.ncols(),
            rows2: v.len(),
            cols2: 1,
        });
    }
    Ok(matrix * DVector::from_column_slice(v))
}

/// Computes the quadratic form `wᵀ M w`.
pub fn quadratic_form(matrix: &DMatrix<f64>, w: &[f64]) -> MathResult<f64> {
    if matrix.nrows() != matrix.ncols() {
        return Err(MathError::invalid_input("matrix must be square"));
    }
    let mw = mat_vec(matrix, w)?;
    Ok(w.iter().zip(mw.iter()).map(|(a, b)| a * b).sum())
}

/// Checks that a covariance matrix is square, finite, symmetric and
/// positive semidefinite.
///
/// Eigenvalues down to `-1e-12 × largest |entry|` are accepted as rounding.
pub fn check_covariance(matrix: &DMatrix<f64>) -> MathResult<()> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: matrix.ncols(),
            rows2: matrix.ncols(),
            cols2: n,
        });
    }
    if n == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(MathError::non_finite("covariance matrix"));
    }

    let scale = matrix.iter().fold(0.0_f64, |acc, x| acc.max(x.abs())).max(f64::MIN_POSITIVE);
    for i in 0..n {
        for j in (i + 1)..n {
            let difference = (matrix[(i, j)] - matrix[(j, i)]).abs();
            if difference > SYMMETRY_TOLERANCE * scale {
                return Err(MathError::NotSymmetric {
                    row: i,
                    col: j,
                    difference,
                });
            }
        }
    }

    let eigen = matrix.clone().symmetric_eigen();
    let min_eigenvalue = eigen
        .eigenvalues
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    if min_eigenvalue < -EIGEN_TOLERANCE * scale {
        return Err(MathError::NotPositiveSemidefinite { min_eigenvalue });
    }

    Ok(())
}
