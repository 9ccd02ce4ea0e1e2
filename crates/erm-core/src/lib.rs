//! # ERM Core
//!
//! Core types and the error taxonomy shared by the ERM risk analytics crates.
//!
//! This crate provides the foundational building blocks used by the loader,
//! the statistics engine and the VaR calculator:
//!
//! - **Holdings**: `Holding`, `AssetType`, `Portfolio` with market values and weights
//! - **Price history**: `PriceHistory` on a single ascending date axis
//! - **Analysis settings**: `ConfidenceLevel`, `TimeHorizon`, `DataFrequency`, `ReturnMethod`
//! - **Scales**: `ScaleConfig` threshold mapping onto 5- or 6-point ordinal scores
//! - **Errors**: `RiskError`, the typed failures reported to callers
//!
//! ## Example
//!
//! ```rust
//! use erm_core::prelude::*;
//!
//! let holding = Holding::new("ACME", AssetType::Equity, 100.0, 25.0).unwrap();
//! assert_eq!(holding.market_value(), 2_500.0);
//!
//! let scale = ScaleConfig::standard(MatrixSize::Five);
//! assert_eq!(scale.likelihood_score(12.0), 3);
//! ```

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
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{RiskError, RiskResult};
    pub use crate::types::{
        AnalysisConfig, AssetType, ConfidenceLevel, DataFrequency, Holding, ImpactBasis,
        MatrixSize, Portfolio, PriceHistory, PriceSeries, ReturnMethod, ScaleConfig, TimeHorizon,
        TRADING_DAYS_PER_YEAR,
    };
}

pub use error::{RiskError, RiskResult};
