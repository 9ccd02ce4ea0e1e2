//! Correlation from covariance.

use log::warn;
use nalgebra::DMatrix;

use crate::error::{MathError, MathResult};

/// Variances at or below this are treated as zero (constant price).
pub const ZERO_VARIANCE_TOLERANCE: f64 = 1e-18;

/// Correlation matrix together with the assets whose correlation is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    /// N×N matrix, entries in [-1, 1], diagonal exactly 1.
    pub matrix: DMatrix<f64>,
    /// Column indices of zero-variance assets. Their off-diagonal entries are 0.
    pub zero_variance: Vec<usize>,
}

impl CorrelationMatrix {
    /// Correlation between assets `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Number of assets.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Rows as plain vectors, for serialisation.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dim())
            .map(|i| self.matrix.row(i).iter().copied().collect())
            .collect()
    }
}

/// Normalises a covariance matrix: ρ_ij = Σ_ij / (σ_i σ_j), clamped to [-1, 1].
///
/// A zero-variance asset has undefined correlation; it gets 0 against every
/// other asset and is listed in [`CorrelationMatrix::zero_variance`].
pub fn correlation_from_covariance(covariance: &DMatrix<f64>) -> MathResult<CorrelationMatrix> {
    let n = covariance.nrows();
    if n != covariance.ncols() {
        return Err(MathError::invalid_input("covariance matrix must be square"));
    }

    let std_devs: Vec<Option<f64>> = (0..n)
        .map(|i| {
            let var = covariance[(i, i)];
            (var > ZERO_VARIANCE_TOLERANCE).then(|| var.sqrt())
        })
        .collect();

    let zero_variance: Vec<usize> = std_devs
        .iter()
        .enumerate()
        .filter_map(|(i, sd)| sd.is_none().then_some(i))
        .collect();
    if !zero_variance.is_empty() {
        warn!(
            "{} asset(s) with zero variance; correlation treated as 0",
            zero_variance.len()
        );
    }

    let matrix = DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            return 1.0;
        }
        match (std_devs[i], std_devs[j]) {
            (Some(si), Some(sj)) => (covariance[(i, j)] / (si * sj)).clamp(-1.0, 1.0),
            _ => 0.0,
        }
    });

    Ok(CorrelationMatrix {
        matrix,
        zero_variance,
    })
}
