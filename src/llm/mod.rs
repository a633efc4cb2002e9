// src/llm/mod.rs
//! Optional LLM helpers: invite parsing and job-description analysis

pub mod client;
pub mod extract;
pub mod prompts;

pub use client::LlmClient;
pub use extract::{extract_json_object, ParsedInterview};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Openai,
    Claude,
    Qwen,
    Zhipu,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Openai => "gpt-4o-mini",
            LlmProvider::Claude => "claude-3-haiku-20240307",
            LlmProvider::Qwen => "qwen-turbo",
            LlmProvider::Zhipu => "glm-4-flash",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Openai => "https://api.openai.com/v1",
            LlmProvider::Claude => "https://api.anthropic.com",
            LlmProvider::Qwen => "https://dashscope.aliyuncs.com/compatible-mode/v1",
            LlmProvider::Zhipu => "https://open.bigmodel.cn/api/paas/v4",
        }
    }

    /// Everything except Claude speaks the OpenAI chat-completions dialect
    pub fn is_openai_compatible(&self) -> bool {
        !matches!(self, LlmProvider::Claude)
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmProvider::Openai => "openai",
            LlmProvider::Claude => "claude",
            LlmProvider::Qwen => "qwen",
            LlmProvider::Zhipu => "zhipu",
        };
        f.write_str(name)
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::Openai),
            "claude" | "anthropic" => Ok(LlmProvider::Claude),
            "qwen" => Ok(LlmProvider::Qwen),
            "zhipu" | "glm" => Ok(LlmProvider::Zhipu),
            other => anyhow::bail!("Unknown LLM provider: {}. Use openai, claude, qwen or zhipu", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// Key with everything but the last four characters hidden
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM is not configured; run `offermatrix llm configure` first")]
    NotConfigured,
    #[error("{0} is empty")]
    EmptyInput(&'static str),
    #[error("LLM API call failed: {status} {body}")]
    Http { status: u16, body: String },
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected LLM response shape: {0}")]
    UnexpectedResponse(String),
    #[error("could not find a JSON object in the model output")]
    NoJson,
    #[error("failed to parse JSON from the model output: {0}")]
    MalformedJson(String),
    #[error("state store error: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset_or_blank() {
        let config = LlmConfig {
            provider: LlmProvider::Qwen,
            api_key: "k".to_string(),
            model: Some("  ".to_string()),
            base_url: None,
        };
        assert_eq!(config.model(), "qwen-turbo");
        assert_eq!(
            config.base_url(),
            "https://dashscope.aliyuncs.com/compatible-mode/v1"
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let config = LlmConfig {
            provider: LlmProvider::Openai,
            api_key: "k".to_string(),
            model: Some("gpt-4o".to_string()),
            base_url: Some("http://localhost:11434/v1/".to_string()),
        };
        assert_eq!(config.base_url(), "http://localhost:11434/v1");
        assert_eq!(config.model(), "gpt-4o");
    }

    #[test]
    fn test_provider_parsing_and_wire_name() {
        assert_eq!("Anthropic".parse::<LlmProvider>().unwrap(), LlmProvider::Claude);
        assert!("bard".parse::<LlmProvider>().is_err());
        assert_eq!(serde_json::to_string(&LlmProvider::Zhipu).unwrap(), "\"zhipu\"");
        assert!(!LlmProvider::Claude.is_openai_compatible());
    }

    #[test]
    fn test_masked_key() {
        let config = LlmConfig {
            provider: LlmProvider::Openai,
            api_key: "sk-abcdef123456".to_string(),
            model: None,
            base_url: None,
        };
        assert_eq!(config.masked_key(), "****3456");
    }
}
