// src/types/response.rs
use serde::{Deserialize, Serialize};

/// Error body the backend returns on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    /// Decode `{"error": "..."}` when present; anything else yields `None`
    pub fn decode(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .map(|b| b.error)
            .filter(|e| !e.trim().is_empty())
    }
}

/// Plain acknowledgement, e.g. `{"message": "deleted"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_body() {
        assert_eq!(
            ApiErrorBody::decode(r#"{"error":"application not found"}"#),
            Some("application not found".to_string())
        );
        assert_eq!(ApiErrorBody::decode("<html>502 Bad Gateway</html>"), None);
        assert_eq!(ApiErrorBody::decode(r#"{"error":""}"#), None);
        assert_eq!(ApiErrorBody::decode(r#"{"message":"x"}"#), None);
    }
}
