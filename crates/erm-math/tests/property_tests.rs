//! Property-based tests for the statistics engine.
//!
//! For any finite return matrix with at least two periods:
//! - the covariance matrix is symmetric with a non-negative diagonal
//! - portfolio variance wᵀΣw is never meaningfully negative
//! - correlations lie in [-1, 1] with a unit diagonal
//! - a constant column is flagged as zero variance

use erm_math::prelude::*;
use erm_math::statistics::ZERO_VARIANCE_TOLERANCE;
use nalgebra::DMatrix;
use proptest::prelude::*;

/// Return matrices of 1..6 assets over 2..60 periods, moves within ±10%.
fn return_matrix_strategy() -> impl Strategy<Value = DMatrix<f64>> {
    (1usize..6, 2usize..60).prop_flat_map(|(assets, periods)| {
        prop::collection::vec(-0.1f64..0.1, assets * periods)
            .prop_map(move |values| DMatrix::from_vec(periods, assets, values))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn covariance_is_symmetric_with_nonnegative_diagonal(returns in return_matrix_strategy()) {
        let cov = covariance_matrix(&returns).unwrap();
        let k = returns.ncols();
        prop_assert_eq!(cov.shape(), (k, k));

        for i in 0..k {
            prop_assert!(cov[(i, i)] >= 0.0, "variance {} < 0", cov[(i, i)]);
            for j in 0..k {
                prop_assert_eq!(cov[(i, j)], cov[(j, i)]);
            }
        }
    }

    #[test]
    fn portfolio_variance_is_nonnegative(
        returns in return_matrix_strategy(),
        raw_weights in prop::collection::vec(-1.0f64..1.0, 6),
    ) {
        let cov = covariance_matrix(&returns).unwrap();
        let weights = &raw_weights[..cov.nrows()];
        let variance = quadratic_form(&cov, weights).unwrap();
        prop_assert!(variance >= -1e-12, "wᵀΣw = {variance}");
    }

    #[test]
    fn correlation_bounded_with_unit_diagonal(returns in return_matrix_strategy()) {
        let cov = covariance_matrix(&returns).unwrap();
        let corr = correlation_from_covariance(&cov).unwrap();
        let k = corr.dim();
        prop_assert_eq!(k, returns.ncols());

        for i in 0..k {
            prop_assert_eq!(corr.get(i, i), 1.0);
            for j in 0..k {
                let rho = corr.get(i, j);
                prop_assert!((-1.0..=1.0).contains(&rho), "rho[{i},{j}] = {rho}");
                prop_assert_eq!(rho, corr.get(j, i));
            }
        }
    }

    #[test]
    fn constant_column_flagged_as_zero_variance(
        returns in return_matrix_strategy(),
        column in 0usize..6,
    ) {
        let mut returns = returns;
        let column = column % returns.ncols();
        returns.column_mut(column).fill(0.01);

        let cov = covariance_matrix(&returns).unwrap();
        prop_assert!(cov[(column, column)] <= ZERO_VARIANCE_TOLERANCE);

        let corr = correlation_from_covariance(&cov).unwrap();
        prop_assert!(corr.zero_variance.contains(&column));
        prop_assert_eq!(corr.get(column, column), 1.0);
        for j in (0..corr.dim()).filter(|&j| j != column) {
            prop_assert_eq!(corr.get(column, j), 0.0);
        }
    }
}
