//! Scale configuration validation and stored records.

use chrono::{DateTime, Utc};
use erm_core::types::{check_thresholds, ScaleConfig};
use erm_core::RiskError;
use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

impl Validate for ScaleConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let expected = self.matrix_size.threshold_count();
        [
            ("volatility", &self.volatility_thresholds),
            ("value", &self.value_thresholds),
        ]
        .into_iter()
        .filter_map(|(scale, thresholds)| {
            check_thresholds(scale, thresholds, expected)
                .err()
                .map(|err| threshold_error(scale, &err))
        })
        .collect()
    }
}

fn threshold_error(scale: &str, err: &RiskError) -> ValidationError {
    let field = format!("{scale}_thresholds");
    match err {
        RiskError::ThresholdOrderingViolation { .. } => {
            ValidationError::with_rule(field, err.to_string(), "strictly_increasing")
        }
        RiskError::InvalidConfiguration { reason, .. } => {
            ValidationError::with_rule(field, reason.clone(), "threshold_count")
        }
        other => ValidationError::new(field, other.to_string()),
    }
}

/// A scale configuration as persisted for one organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScaleConfig {
    /// Owning organisation.
    pub org_id: String,
    /// The configuration.
    pub config: ScaleConfig,
    /// Time of the last write.
    pub updated_at: DateTime<Utc>,
}

impl StoredScaleConfig {
    /// Wraps a configuration, stamped now.
    pub fn new(org_id: impl Into<String>, config: ScaleConfig) -> Self {
        Self {
            org_id: org_id.into(),
            config,
            updated_at: Utc::now(),
        }
    }
}

/// Checks that an organisation id is usable as a store key and file name.
pub fn validate_org_id(org_id: &str) -> Result<(), ValidationError> {
    if org_id.is_empty() {
        return Err(ValidationError::new("org_id", "organization id cannot be empty"));
    }
    if !org_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::with_rule(
            "org_id",
            format!("'{org_id}' may only contain letters, digits, '-' and '_'"),
            "org_id_charset",
        ));
    }
    Ok(())
}
