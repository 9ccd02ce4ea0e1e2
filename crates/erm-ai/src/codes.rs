//! Allocation of unique risk codes for AI-generated risks.
//!
//! Codes have the form `PREFIX-NNN`. Two writers can read the same next
//! sequence number, so inserting may collide with a code that was taken in
//! the meantime. [`create_with_unique_code`] retries such collisions a
//! bounded number of times with exponential backoff; any other registry
//! failure ends the loop at once.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{AiError, AiResult, RegistryError};
use crate::risks::GeneratedRisk;

/// Prefix used when a category yields no usable letters.
pub const DEFAULT_PREFIX: &str = "RSK";

/// The risk register, as far as code allocation needs it.
#[async_trait]
pub trait RiskCodeRegistry: Send + Sync {
    /// Next free sequence number for `prefix`, as the registry sees it now.
    async fn next_sequence(&self, prefix: &str) -> Result<u32, RegistryError>;

    /// Inserts `risk` under `code`. Fails with
    /// [`RegistryError::DuplicateCode`] if the code is taken.
    async fn insert(&self, code: &str, risk: &GeneratedRisk) -> Result<(), RegistryError>;
}

/// Bounds of the code allocation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Wait after the first collision.
    pub initial_backoff: Duration,
    /// Upper bound of the wait.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` attempts and no waiting.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Wait after the collision of attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Code prefix derived from a category: its first three ASCII letters, upper-cased.
pub fn code_prefix(category: &str) -> String {
    let prefix: String = category
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(3)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if prefix.len() < 3 {
        DEFAULT_PREFIX.to_string()
    } else {
        prefix
    }
}

/// Formats a risk code.
pub fn format_code(prefix: &str, sequence: u32) -> String {
    format!("{prefix}-{sequence:03}")
}

/// Inserts `risk` under a fresh code, retrying duplicate-code collisions.
///
/// Returns the code the risk was stored under.
///
/// # Errors
///
/// - [`AiError::CodeExhausted`] when every attempt collided
/// - [`AiError::Registry`] on the first non-duplicate failure
/// - [`AiError::InvalidInput`] if `policy` allows no attempts
pub async fn create_with_unique_code(
    registry: &dyn RiskCodeRegistry,
    risk: &GeneratedRisk,
    policy: &RetryPolicy,
) -> AiResult<String> {
    if policy.max_attempts == 0 {
        return Err(AiError::invalid_input("retry policy allows no attempts"));
    }
    let prefix = code_prefix(&risk.category);

    for attempt in 1..=policy.max_attempts {
        let sequence = registry
            .next_sequence(&prefix)
            .await
            .map_err(|e| AiError::Registry(e.to_string()))?;
        let code = format_code(&prefix, sequence);

        match registry.insert(&code, risk).await {
            Ok(()) => {
                info!(code = %code, attempt, "risk created");
                return Ok(code);
            }
            Err(err) if err.is_retryable() => {
                warn!(code = %code, attempt, max = policy.max_attempts, "risk code collision");
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.backoff(attempt)).await;
                }
            }
            Err(err) => return Err(AiError::Registry(err.to_string())),
        }
    }

    Err(AiError::CodeExhausted {
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_prefix() {
        assert_eq!(code_prefix("Operational"), "OPE");
        assert_eq!(code_prefix("  it/cyber"), "ITC");
        assert_eq!(code_prefix("IT"), "RSK");
        assert_eq!(code_prefix(""), "RSK");
    }

    #[test]
    fn test_format_code() {
        assert_eq!(format_code("FIN", 7), "FIN-007");
        assert_eq!(format_code("FIN", 1234), "FIN-1234");
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(350));
        assert_eq!(policy.backoff(40), Duration::from_millis(350));
    }
}
