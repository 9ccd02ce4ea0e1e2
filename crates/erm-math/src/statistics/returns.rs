//! Period returns from price series.

use erm_core::types::{PriceHistory, ReturnMethod};
use nalgebra::DMatrix;

use crate::error::{MathError, MathResult};

/// Returns of one price series: one value per consecutive pair.
///
/// Prices must be finite and positive.
pub fn returns(prices: &[f64], method: ReturnMethod) -> MathResult<Vec<f64>> {
    if prices.len() < 2 {
        return Err(MathError::insufficient_data(2, prices.len()));
    }
    if let Some(p) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(MathError::invalid_input(format!(
            "prices must be positive to form returns, got {p}"
        )));
    }

    Ok(prices
        .windows(2)
        .map(|w| match method {
            ReturnMethod::Simple => w[1] / w[0] - 1.0,
            ReturnMethod::Log => (w[1] / w[0]).ln(),
        })
        .collect())
}

/// Return matrix of a history: one row per period, one column per asset,
/// in the history's column order.
pub fn return_matrix(history: &PriceHistory, method: ReturnMethod) -> MathResult<DMatrix<f64>> {
    let n_assets = history.series().len();
    if n_assets == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    let columns = history
        .series()
        .iter()
        .map(|s| returns(&s.prices, method))
        .collect::<MathResult<Vec<_>>>()?;

    let n_periods = columns[0].len();
    Ok(DMatrix::from_fn(n_periods, n_assets, |t, j| columns[j][t]))
}
