//! # ERM Analytics
//!
//! Portfolio Value-at-Risk engine for the ERM risk analytics library.
//!
//! - **Parametric VaR**: variance-covariance VaR with square-root-of-time scaling
//! - **Euler allocation**: per-asset contributions that sum to portfolio VaR
//! - **Standalone VaR** and the diversification benefit
//! - **Historical VaR**: empirical quantile cross-check over the same window
//! - **Scale mapping**: likelihood and impact scores on a 5x5 or 6x6 risk matrix
//!
//! ## Architecture
//!
//! `erm-analytics` consumes the domain types of `erm-core` and the statistics
//! of `erm-math`. It never reads files or configuration stores; the scale
//! configuration is handed to [`VaRCalculator`] by the caller.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use erm_analytics::prelude::*;
//! use erm_core::prelude::*;
//!
//! let scale = ScaleConfig::standard(MatrixSize::Five);
//! let config = AnalysisConfig::new(ConfidenceLevel::P95, TimeHorizon::new(10)?);
//!
//! let result = VaRCalculator::new(&scale)?.calculate(&portfolio, &history, &config)?;
//! for asset in &result.assets {
//!     println!("{}: {:.2}", asset.asset, asset.contribution);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
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
#![allow(clippy::similar_names)]

pub mod calculator;
pub mod scale;
pub mod var;

pub use calculator::VaRCalculator;
pub use scale::{score, RiskScores};
pub use var::{AnalysisWarning, AssetVaR, VaRResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calculator::VaRCalculator;
    pub use crate::scale::{score, RiskScores};
    pub use crate::var::{
        historical_var, parametric_var, portfolio_returns, AnalysisWarning, AssetVaR,
        ParametricInputs, ParametricVaR, VaRResult,
    };
}
