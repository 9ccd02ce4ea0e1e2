//! Control suggestions for a risk.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::{ChatMessage, CompletionClient};
use crate::error::AiResult;
use crate::parse::{parse_llm_json, require_text, LlmParse, RequiredFields};

/// Highest DIME score.
pub const MAX_DIME_SCORE: u8 = 3;

/// The risk a control is suggested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Register code.
    pub code: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category.
    pub category: String,
}

/// How a control acts on a risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    /// Stops the event from happening.
    Preventive,
    /// Detects the event once it happened.
    Detective,
    /// Limits the damage afterwards.
    Corrective,
    /// Policy or guidance.
    Directive,
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Preventive => "preventive",
            Self::Detective => "detective",
            Self::Corrective => "corrective",
            Self::Directive => "directive",
        };
        f.write_str(s)
    }
}

/// Design, Implementation, Monitoring and Evaluation scores, 0..=3 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimeScores {
    /// Design adequacy.
    pub design: u8,
    /// Implementation.
    pub implementation: u8,
    /// Monitoring.
    pub monitoring: u8,
    /// Evaluation.
    pub evaluation: u8,
}

impl DimeScores {
    /// Sum of the four scores, 0..=12.
    pub fn total(&self) -> u8 {
        self.design + self.implementation + self.monitoring + self.evaluation
    }

    /// Mean score.
    pub fn average(&self) -> f64 {
        f64::from(self.total()) / 4.0
    }
}

impl RequiredFields for DimeScores {
    fn check_required(&self) -> Result<(), String> {
        [
            ("design", self.design),
            ("implementation", self.implementation),
            ("monitoring", self.monitoring),
            ("evaluation", self.evaluation),
        ]
        .into_iter()
        .find(|(_, score)| *score > MAX_DIME_SCORE)
        .map_or(Ok(()), |(field, score)| {
            Err(format!("'{field}' is {score}, outside 0..={MAX_DIME_SCORE}"))
        })
    }
}

/// A control proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedControl {
    /// Control name.
    pub name: String,
    /// What the control does.
    pub description: String,
    /// Control type.
    pub control_type: ControlType,
    /// DIME assessment.
    #[serde(flatten)]
    pub dime: DimeScores,
}

impl RequiredFields for SuggestedControl {
    fn check_required(&self) -> Result<(), String> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        self.dime.check_required()
    }
}

/// Builds the conversation asking for controls mitigating `risk`.
pub fn build_control_prompt(risk: &RiskSummary) -> Vec<ChatMessage> {
    let system = format!(
        "You are an internal-control specialist. Reply with a JSON array only. Each element has \
         \"name\", \"description\", \"control_type\" (one of preventive, detective, corrective, \
         directive) and the integer scores \"design\", \"implementation\", \"monitoring\" and \
         \"evaluation\" between 0 and {MAX_DIME_SCORE}."
    );
    let user = format!(
        "Risk {}: {}\nCategory: {}\n{}\n\nSuggest controls for this risk.",
        risk.code, risk.title, risk.category, risk.description
    );
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Asks the model for controls and interprets the reply.
pub async fn suggest_controls(
    client: &dyn CompletionClient,
    risk: &RiskSummary,
) -> AiResult<LlmParse<Vec<SuggestedControl>>> {
    let reply = client.complete(&build_control_prompt(risk)).await?;
    Ok(parse_llm_json(&reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_dime_scores() {
        let json = r#"[{"name":"Dual approval","description":"Two signatures","control_type":"preventive",
            "design":3,"implementation":2,"monitoring":1,"evaluation":0}]"#;
        let parsed: LlmParse<Vec<SuggestedControl>> = parse_llm_json(json);
        let controls = parsed.into_parsed().unwrap();
        assert_eq!(controls[0].control_type, ControlType::Preventive);
        assert_eq!(controls[0].dime.total(), 6);
        assert!((controls[0].dime.average() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_dime_rejected() {
        let json = r#"[{"name":"n","description":"d","control_type":"detective",
            "design":4,"implementation":0,"monitoring":0,"evaluation":0}]"#;
        let parsed: LlmParse<Vec<SuggestedControl>> = parse_llm_json(json);
        match parsed {
            LlmParse::ParseFailure { reason, .. } => {
                assert_eq!(reason, "item 0: 'design' is 4, outside 0..=3");
            }
            LlmParse::Parsed(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_unknown_control_type_rejected() {
        let json = r#"[{"name":"n","description":"d","control_type":"magic",
            "design":1,"implementation":1,"monitoring":1,"evaluation":1}]"#;
        let parsed: LlmParse<Vec<SuggestedControl>> = parse_llm_json(json);
        assert!(!parsed.is_parsed());
    }
}
