//! Extraction of JSON payloads from free-form model replies.
//!
//! Models often wrap the requested JSON in prose or code fences. Parsing is a
//! three-step pipeline: locate the first balanced `[...]` or `{...}` span,
//! deserialise it, then check required fields. Any failure yields
//! [`LlmParse::ParseFailure`] with the raw reply; values are never coerced.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of interpreting a model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmParse<T> {
    /// The reply held a valid payload.
    Parsed(T),
    /// The reply could not be interpreted.
    ParseFailure {
        /// The reply as received.
        raw: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl<T> LlmParse<T> {
    /// True for [`LlmParse::Parsed`].
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// The payload, if parsed.
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::ParseFailure { .. } => None,
        }
    }

    /// Consumes into the payload, if parsed.
    pub fn into_parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::ParseFailure { .. } => None,
        }
    }

    /// Maps the payload, keeping failures as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LlmParse<U> {
        match self {
            Self::Parsed(value) => LlmParse::Parsed(f(value)),
            Self::ParseFailure { raw, reason } => LlmParse::ParseFailure { raw, reason },
        }
    }

    fn failure(raw: &str, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// Semantic checks run after deserialisation.
pub trait RequiredFields {
    /// Describes the first missing or out-of-range field.
    fn check_required(&self) -> Result<(), String>;
}

impl<T: RequiredFields> RequiredFields for Vec<T> {
    fn check_required(&self) -> Result<(), String> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.check_required().map_err(|e| format!("item {i}: {e}")))
    }
}

/// Fails with `field` when `value` is blank.
pub fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{field}' is missing or blank"))
    } else {
        Ok(())
    }
}

/// Locates the first balanced JSON array or object in `text`.
///
/// Whichever of `[` and `{` appears first opens the span. Brackets inside
/// string literals are ignored.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c == '[' || c == '{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extracts, deserialises and validates a JSON payload from a model reply.
pub fn parse_llm_json<T>(raw: &str) -> LlmParse<T>
where
    T: DeserializeOwned + RequiredFields,
{
    let Some(span) = extract_json_span(raw) else {
        return LlmParse::failure(raw, "no JSON array or object found in reply");
    };
    let value: T = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "model reply is not valid for the expected shape");
            return LlmParse::failure(raw, format!("invalid JSON payload: {err}"));
        }
    };
    if let Err(reason) = value.check_required() {
        return LlmParse::failure(raw, reason);
    }
    LlmParse::Parsed(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    impl RequiredFields for Item {
        fn check_required(&self) -> Result<(), String> {
            require_text("name", &self.name)
        }
    }

    #[test]
    fn test_span_in_prose() {
        let text = "Sure! Here you go:\n```json\n[{\"name\": \"a]\"}]\n```\nAnything else?";
        assert_eq!(extract_json_span(text), Some("[{\"name\": \"a]\"}]"));
    }

    #[test]
    fn test_object_before_array() {
        let text = "{\"a\": [1, 2]} and [3]";
        assert_eq!(extract_json_span(text), Some("{\"a\": [1, 2]}"));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let text = r#"{"q": "say \"}\" now"} tail"#;
        assert_eq!(extract_json_span(text), Some(r#"{"q": "say \"}\" now"}"#));
    }

    #[test]
    fn test_unbalanced_is_none() {
        assert_eq!(extract_json_span("[1, 2"), None);
        assert_eq!(extract_json_span("no json here"), None);
    }

    #[test]
    fn test_parse_ok() {
        let parsed: LlmParse<Vec<Item>> = parse_llm_json("x [{\"name\":\"a\"}] y");
        assert_eq!(parsed.into_parsed().unwrap(), vec![Item { name: "a".into() }]);
    }

    #[test]
    fn test_blank_required_field_is_rejected() {
        let parsed: LlmParse<Vec<Item>> = parse_llm_json("[{\"name\":\"a\"},{\"name\":\" \"}]");
        match parsed {
            LlmParse::ParseFailure { reason, raw } => {
                assert_eq!(reason, "item 1: 'name' is missing or blank");
                assert!(raw.starts_with('['));
            }
            LlmParse::Parsed(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let parsed: LlmParse<Vec<Item>> = parse_llm_json("[{\"title\":\"a\"}]");
        assert!(!parsed.is_parsed());
    }
}
