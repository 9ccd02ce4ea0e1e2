//! Incident-to-risk linking.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::{ChatMessage, CompletionClient};
use crate::error::{AiError, AiResult};
use crate::parse::{parse_llm_json, require_text, LlmParse, RequiredFields};

/// An incident to be linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Title.
    pub title: String,
    /// What happened.
    pub description: String,
}

/// A register entry the incident may relate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRisk {
    /// Register code.
    pub code: String,
    /// Title.
    pub title: String,
}

/// A proposed link between the incident and a risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRiskLink {
    /// Code of the linked risk.
    pub risk_code: String,
    /// Model confidence, 0..=1.
    pub confidence: f64,
    /// Why the incident relates to the risk.
    pub rationale: String,
}

impl RequiredFields for IncidentRiskLink {
    fn check_required(&self) -> Result<(), String> {
        require_text("risk_code", &self.risk_code)?;
        require_text("rationale", &self.rationale)?;
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "'confidence' of '{}' is {}, outside 0..=1",
                self.risk_code, self.confidence
            ));
        }
        Ok(())
    }
}

/// Links kept and links dropped because they named an unknown risk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkOutcome {
    /// Links to candidate risks, most confident first.
    pub links: Vec<IncidentRiskLink>,
    /// Links naming codes that were not among the candidates.
    pub dropped: Vec<IncidentRiskLink>,
}

/// Builds the conversation asking which candidates the incident relates to.
pub fn build_link_prompt(
    incident: &Incident,
    candidates: &[CandidateRisk],
) -> AiResult<Vec<ChatMessage>> {
    if candidates.is_empty() {
        return Err(AiError::invalid_input("no candidate risks to link against"));
    }
    let system = "You link incidents to the risks they evidence. Reply with a JSON array only. \
                  Each element has \"risk_code\" (one of the listed codes), \"confidence\" \
                  (a number between 0 and 1) and \"rationale\". Return [] if nothing applies.";
    let list = candidates
        .iter()
        .map(|c| format!("- {}: {}", c.code, c.title))
        .collect::<Vec<_>>()
        .join("\n");
    let user = format!(
        "Incident: {}\n{}\n\nCandidate risks:\n{list}",
        incident.title, incident.description
    );
    Ok(vec![ChatMessage::system(system), ChatMessage::user(user)])
}

/// Asks the model which candidate risks the incident relates to.
pub async fn link_incident(
    client: &dyn CompletionClient,
    incident: &Incident,
    candidates: &[CandidateRisk],
) -> AiResult<LlmParse<LinkOutcome>> {
    let messages = build_link_prompt(incident, candidates)?;
    let reply = client.complete(&messages).await?;

    Ok(parse_llm_json::<Vec<IncidentRiskLink>>(&reply).map(|proposed| {
        let (mut links, dropped): (Vec<_>, Vec<_>) = proposed
            .into_iter()
            .partition(|l| candidates.iter().any(|c| c.code == l.risk_code));
        for link in &dropped {
            warn!(risk_code = %link.risk_code, "model linked an unknown risk code; dropped");
        }
        links.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        LinkOutcome { links, dropped }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_candidates() {
        let incident = Incident {
            title: "Server outage".into(),
            description: "Datacentre lost power".into(),
        };
        let candidates = vec![
            CandidateRisk {
                code: "OPS-001".into(),
                title: "IT failure".into(),
            },
            CandidateRisk {
                code: "FIN-002".into(),
                title: "FX loss".into(),
            },
        ];
        let msgs = build_link_prompt(&incident, &candidates).unwrap();
        assert!(msgs[1].content.contains("- OPS-001: IT failure\n- FIN-002: FX loss"));
    }

    #[test]
    fn test_no_candidates() {
        let incident = Incident {
            title: "t".into(),
            description: "d".into(),
        };
        assert!(build_link_prompt(&incident, &[]).is_err());
    }

    #[test]
    fn test_confidence_range() {
        let link = IncidentRiskLink {
            risk_code: "A".into(),
            confidence: 1.2,
            rationale: "r".into(),
        };
        assert!(link.check_required().is_err());
    }
}
