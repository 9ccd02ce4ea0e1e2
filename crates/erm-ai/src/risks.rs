//! Risk generation from an organisation profile.

use erm_core::types::MatrixSize;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{ChatMessage, CompletionClient};
use crate::error::{AiError, AiResult};
use crate::parse::{parse_llm_json, require_text, LlmParse, RequiredFields};

/// What the model is told about the organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationContext {
    /// Organisation name.
    pub name: String,
    /// Industry or sector.
    pub industry: String,
    /// Free-text description of the business.
    pub description: String,
    /// Titles already in the register; the model is asked not to repeat them.
    pub existing_risks: Vec<String>,
    /// Size of the organisation's risk matrix.
    pub matrix_size: MatrixSize,
}

/// A risk proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRisk {
    /// Short title.
    pub title: String,
    /// One or two sentences.
    pub description: String,
    /// Risk category, e.g. operational or financial.
    pub category: String,
    /// Likelihood, 1..=N.
    pub likelihood: u8,
    /// Impact, 1..=N.
    pub impact: u8,
}

impl GeneratedRisk {
    /// Checks both scores against a matrix size.
    pub fn check_scores(&self, matrix_size: MatrixSize) -> Result<(), String> {
        let max = matrix_size.points();
        for (field, score) in [("likelihood", self.likelihood), ("impact", self.impact)] {
            if !(1..=max).contains(&score) {
                return Err(format!(
                    "'{field}' of '{}' is {score}, outside 1..={max}",
                    self.title
                ));
            }
        }
        Ok(())
    }
}

impl RequiredFields for GeneratedRisk {
    fn check_required(&self) -> Result<(), String> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("category", &self.category)
    }
}

/// Builds the conversation asking for `count` new risks.
pub fn build_risk_prompt(ctx: &OrganizationContext, count: usize) -> AiResult<Vec<ChatMessage>> {
    if count == 0 {
        return Err(AiError::invalid_input("at least one risk must be requested"));
    }
    let max = ctx.matrix_size.points();
    let system = format!(
        "You are an enterprise risk analyst. Reply with a JSON array only. Each element has \
         the string fields \"title\", \"description\" and \"category\", and the integer fields \
         \"likelihood\" and \"impact\" between 1 and {max}."
    );

    let existing = if ctx.existing_risks.is_empty() {
        "none".to_string()
    } else {
        ctx.existing_risks.join("; ")
    };
    let user = format!(
        "Organisation: {}\nIndustry: {}\nDescription: {}\nExisting risks (do not repeat): {}\n\n\
         Propose {count} new risks.",
        ctx.name, ctx.industry, ctx.description, existing
    );

    Ok(vec![ChatMessage::system(system), ChatMessage::user(user)])
}

/// Asks the model for new risks and interprets the reply.
///
/// Proposals whose title repeats an existing risk are dropped. A score
/// outside the organisation's matrix rejects the whole reply.
pub async fn generate_risks(
    client: &dyn CompletionClient,
    ctx: &OrganizationContext,
    count: usize,
) -> AiResult<LlmParse<Vec<GeneratedRisk>>> {
    let messages = build_risk_prompt(ctx, count)?;
    let reply = client.complete(&messages).await?;

    let risks = match parse_llm_json::<Vec<GeneratedRisk>>(&reply) {
        LlmParse::Parsed(risks) => risks,
        failure => return Ok(failure),
    };
    if let Some(reason) = risks
        .iter()
        .find_map(|r| r.check_scores(ctx.matrix_size).err())
    {
        return Ok(LlmParse::ParseFailure { raw: reply, reason });
    }

    let existing: Vec<String> = ctx
        .existing_risks
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();
    let total = risks.len();
    let fresh: Vec<GeneratedRisk> = risks
        .into_iter()
        .filter(|r| !existing.contains(&r.title.trim().to_lowercase()))
        .collect();
    if fresh.len() < total {
        debug!(dropped = total - fresh.len(), "dropped proposals repeating existing risks");
    }
    Ok(LlmParse::Parsed(fresh))
}
