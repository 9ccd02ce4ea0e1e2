//! # ERM Math
//!
//! Statistics engine for the ERM risk analytics library.
//!
//! This crate provides:
//!
//! - **Returns**: simple and log returns per asset from aligned price series
//! - **Covariance**: unbiased sample covariance matrix (n-1 denominator)
//! - **Correlation**: covariance normalised by standard deviations, clamped to [-1, 1]
//! - **Frequency detection**: daily/weekly/monthly from the date axis
//! - **Distributions**: standard-normal quantiles
//! - **Linear Algebra**: quadratic forms and covariance sanity checks
//!
//! All computation is in `f64`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod distributions;
pub mod error;
pub mod linear_algebra;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::distributions::standard_normal_quantile;
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{check_covariance, mat_vec, quadratic_form};
    pub use crate::statistics::{
        correlation_from_covariance, covariance_matrix, detect_frequency, return_matrix,
        returns, CorrelationMatrix,
    };
}

pub use error::{MathError, MathResult};
