//! Error types for the AI layer.

use thiserror::Error;

/// Result type for AI operations.
pub type AiResult<T> = Result<T, AiError>;

/// Errors raised while talking to the completion service or the risk registry.
///
/// A response that cannot be parsed is not an error: it is reported as
/// [`LlmParse::ParseFailure`](crate::LlmParse::ParseFailure) so the caller can
/// show the raw text.
#[derive(Debug, Error)]
pub enum AiError {
    /// The completion call itself failed.
    #[error("completion failed: {0}")]
    Completion(String),

    /// A prompt could not be built from the given input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The registry rejected a write for a reason other than a duplicate code.
    #[error("registry error: {0}")]
    Registry(String),

    /// Every attempt to allocate a unique risk code collided.
    #[error("could not allocate a unique risk code after {attempts} attempt(s)")]
    CodeExhausted {
        /// Attempts made.
        attempts: u32,
    },
}

impl AiError {
    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Outcome of a registry write, classified for the retry loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another record already holds the code. Retryable.
    #[error("risk code '{0}' already exists")]
    DuplicateCode(String),

    /// Any other failure. Fatal.
    #[error("{0}")]
    Fatal(String),
}

impl RegistryError {
    /// True if a fresh code may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateCode(_))
    }
}
