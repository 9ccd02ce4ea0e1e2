//! # ERM AI
//!
//! Response handling for the AI-assisted features of the risk register.
//!
//! The LLM is an external collaborator reached through the
//! [`CompletionClient`] trait. This crate builds the role-tagged prompts,
//! pulls the JSON payload out of the free-text reply and validates it:
//!
//! - **Risk generation**: new risks for an organisation profile
//! - **Control suggestions**: controls with DIME scores for a risk
//! - **Incident linking**: which register entries an incident evidences
//! - **Risk codes**: bounded, classified retry when allocating unique codes
//!
//! Replies that cannot be interpreted come back as
//! [`LlmParse::ParseFailure`] carrying the raw text, never as coerced data.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use erm_ai::prelude::*;
//!
//! let reply = generate_risks(&client, &org, 5).await?;
//! match reply {
//!     LlmParse::Parsed(risks) => {
//!         for risk in &risks {
//!             let code = create_with_unique_code(&registry, risk, &RetryPolicy::default()).await?;
//!             println!("{code}: {}", risk.title);
//!         }
//!     }
//!     LlmParse::ParseFailure { raw, reason } => eprintln!("{reason}\n{raw}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod codes;
pub mod controls;
pub mod error;
pub mod incidents;
pub mod parse;
pub mod risks;

pub use client::{ChatMessage, CompletionClient, Role};
pub use error::{AiError, AiResult, RegistryError};
pub use parse::{extract_json_span, parse_llm_json, LlmParse, RequiredFields};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::client::{ChatMessage, CompletionClient, Role};
    pub use crate::codes::{create_with_unique_code, RetryPolicy, RiskCodeRegistry};
    pub use crate::controls::{suggest_controls, ControlType, DimeScores, RiskSummary, SuggestedControl};
    pub use crate::error::{AiError, AiResult, RegistryError};
    pub use crate::incidents::{link_incident, CandidateRisk, Incident, IncidentRiskLink, LinkOutcome};
    pub use crate::parse::{extract_json_span, parse_llm_json, LlmParse, RequiredFields};
    pub use crate::risks::{generate_risks, GeneratedRisk, OrganizationContext};
}
