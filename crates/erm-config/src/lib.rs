//! ERM Configuration Layer
//!
//! This crate manages the risk-matrix scale configuration of each
//! organisation: the volatility and value thresholds that map a VaR run onto
//! ordinal likelihood and impact scores.
//!
//! # Features
//!
//! - **Validation**: the [`Validate`] trait reports every invalid field of a
//!   [`ScaleConfig`](erm_core::types::ScaleConfig)
//! - **Stores**: [`ScaleConfigStore`] keyed by organisation id, with an
//!   in-memory and a JSON-file implementation
//! - **Defaults**: [`get_or_default`] falls back to the standard thresholds
//!   for the organisation's matrix size
//!
//! # Example
//!
//! ```rust
//! use erm_config::{get_or_default, InMemoryScaleConfigStore, ScaleConfigStore};
//! use erm_core::types::{MatrixSize, ScaleConfig};
//!
//! let store = InMemoryScaleConfigStore::new();
//!
//! // Nothing stored yet: the standard 5x5 scale applies.
//! let scale = get_or_default(&store, "acme", MatrixSize::Five).unwrap();
//! assert_eq!(scale.likelihood_score(12.0), 3);
//!
//! // Register a stricter scale.
//! let mut strict = ScaleConfig::standard(MatrixSize::Five);
//! strict.volatility_thresholds = vec![2.0, 4.0, 8.0, 16.0];
//! store.put("acme", &strict).unwrap();
//! assert_eq!(get_or_default(&store, "acme", MatrixSize::Five).unwrap(), strict);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod scale;
mod store;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use scale::{validate_org_id, StoredScaleConfig};
pub use store::{get_or_default, InMemoryScaleConfigStore, JsonFileScaleConfigStore, ScaleConfigStore};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::store::{
        get_or_default, InMemoryScaleConfigStore, JsonFileScaleConfigStore, ScaleConfigStore,
    };
}
