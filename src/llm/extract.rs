// src/llm/extract.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::LlmError;
use crate::utils::parse_user_time;

/// Fields pulled out of a free-text interview invitation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedInterview {
    pub company_name: Option<String>,
    pub round_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub meeting_link: Option<String>,
    pub confidence: f64,
}

impl ParsedInterview {
    pub fn from_model_output(output: &str) -> Result<Self, LlmError> {
        let span = extract_json_object(output).ok_or(LlmError::NoJson)?;
        let value: Value =
            serde_json::from_str(span).map_err(|e| LlmError::MalformedJson(e.to_string()))?;

        if !value.is_object() {
            return Err(LlmError::MalformedJson("top-level value is not an object".to_string()));
        }

        Ok(Self {
            company_name: text_field(&value, "company_name"),
            round_name: text_field(&value, "round_name"),
            start_time: text_field(&value, "start_time"),
            end_time: text_field(&value, "end_time"),
            meeting_link: text_field(&value, "meeting_link"),
            confidence: value
                .get("confidence")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        })
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(|t| parse_user_time(t).ok())
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end_time.as_deref().and_then(|t| parse_user_time(t).ok())
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Span from the first `{` to the last `}` in `text`, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_span_from_chatty_output() {
        let output = "Sure! Here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\nLet me know.";
        assert_eq!(extract_json_object(output), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_invite() {
        let output = r#"{
            "company_name": "ByteDance",
            "round_name": "Tech 1",
            "start_time": "2024-02-08T14:00:00Z",
            "end_time": "2024-02-08T15:00:00Z",
            "meeting_link": "",
            "confidence": 0.9
        }"#;
        let parsed = ParsedInterview::from_model_output(output).unwrap();
        assert_eq!(parsed.company_name.as_deref(), Some("ByteDance"));
        assert_eq!(parsed.meeting_link, None);
        assert_eq!(parsed.confidence, 0.9);
        assert_eq!(
            parsed.start().unwrap().to_rfc3339(),
            "2024-02-08T14:00:00+00:00"
        );
    }

    #[test]
    fn test_missing_confidence_and_nulls() {
        let parsed =
            ParsedInterview::from_model_output(r#"{"company_name": null, "round_name": "HR"}"#)
                .unwrap();
        assert_eq!(parsed.company_name, None);
        assert_eq!(parsed.round_name.as_deref(), Some("HR"));
        assert_eq!(parsed.confidence, 0.0);
        assert_eq!(parsed.start(), None);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            ParsedInterview::from_model_output("I could not find anything."),
            Err(LlmError::NoJson)
        ));
        assert!(matches!(
            ParsedInterview::from_model_output("{company_name: ByteDance}"),
            Err(LlmError::MalformedJson(_))
        ));
    }
}
