//! Completion client interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AiResult;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation.
    System,
    /// The application speaking for the user.
    User,
    /// A previous model reply.
    Assistant,
}

/// One message of a role-tagged conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A text-completion service.
///
/// Implementations wrap the vendor HTTP API; this crate only builds the
/// messages and interprets the returned text.
///
/// # Example
///
/// ```ignore
/// let reply = client
///     .complete(&[ChatMessage::system("You are a risk analyst."), ChatMessage::user(prompt)])
///     .await?;
/// ```
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the model's reply to `messages`.
    async fn complete(&self, messages: &[ChatMessage]) -> AiResult<String>;
}
