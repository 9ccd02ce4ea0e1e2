//! Error types for mathematical operations.

use erm_core::RiskError;
use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during statistical and matrix operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Matrix dimensions are incompatible.
    #[error("Incompatible dimensions: ({rows1}x{cols1}) and ({rows2}x{cols2})")]
    DimensionMismatch {
        /// Rows in first operand.
        rows1: usize,
        /// Columns in first operand.
        cols1: usize,
        /// Rows in second operand.
        rows2: usize,
        /// Columns in second operand.
        cols2: usize,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// A value that must be finite is NaN or infinite.
    #[error("Non-finite value in {context}")]
    NonFinite {
        /// Where the value was found.
        context: String,
    },

    /// The matrix is not symmetric.
    #[error("Matrix is not symmetric: entry ({row}, {col}) differs from its transpose by {difference:.2e}")]
    NotSymmetric {
        /// Row of the first asymmetric entry.
        row: usize,
        /// Column of the first asymmetric entry.
        col: usize,
        /// Absolute difference.
        difference: f64,
    },

    /// The matrix has a materially negative eigenvalue.
    #[error("Matrix is not positive semidefinite: smallest eigenvalue {min_eigenvalue:.3e}")]
    NotPositiveSemidefinite {
        /// The smallest eigenvalue.
        min_eigenvalue: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates a non-finite value error.
    #[must_use]
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFinite {
            context: context.into(),
        }
    }
}

impl From<MathError> for RiskError {
    fn from(err: MathError) -> Self {
        RiskError::statistical(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::insufficient_data(2, 1);
        assert!(err.to_string().contains("need at least 2"));
    }

    #[test]
    fn test_converts_to_statistical_error() {
        let err: RiskError = MathError::NotPositiveSemidefinite {
            min_eigenvalue: -0.5,
        }
        .into();
        match err {
            RiskError::StatisticalComputationError { condition } => {
                assert!(condition.contains("positive semidefinite"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
