//! Statistics over aligned price histories.

mod correlation;
mod covariance;
mod frequency;
mod returns;

pub use correlation::{correlation_from_covariance, CorrelationMatrix, ZERO_VARIANCE_TOLERANCE};
pub use covariance::{covariance_matrix, mean, sample_covariance};
pub use frequency::detect_frequency;
pub use returns::{return_matrix, returns};
