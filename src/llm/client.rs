// src/llm/client.rs
//! Provider dispatch: OpenAI-compatible chat completions or Anthropic messages

use anyhow::Context;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{prompts, LlmConfig, LlmError, ParsedInterview};
use crate::core::ConfigStore;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const CLAUDE_MAX_TOKENS: u32 = 1024;
const OPENAI_TEMPERATURE: f64 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

/// Fully described provider call, built before anything is sent
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Client for whatever provider the store has configured
    pub fn from_store(store: &dyn ConfigStore) -> Result<Self, LlmError> {
        let config = store
            .llm_config()
            .map_err(|e| LlmError::Store(e.to_string()))?
            .ok_or(LlmError::NotConfigured)?;
        Self::new(config).map_err(|e| LlmError::Store(e.to_string()))
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn build_request(config: &LlmConfig, prompt: &str) -> ProviderRequest {
        let messages = json!([{ "role": "user", "content": prompt }]);

        if config.provider.is_openai_compatible() {
            ProviderRequest {
                url: format!("{}/chat/completions", config.base_url()),
                headers: vec![("Authorization", format!("Bearer {}", config.api_key))],
                body: json!({
                    "model": config.model(),
                    "messages": messages,
                    "temperature": OPENAI_TEMPERATURE,
                }),
            }
        } else {
            ProviderRequest {
                url: format!("{}/v1/messages", config.base_url()),
                headers: vec![
                    ("x-api-key", config.api_key.clone()),
                    ("anthropic-version", ANTHROPIC_VERSION.to_string()),
                ],
                body: json!({
                    "model": config.model(),
                    "max_tokens": CLAUDE_MAX_TOKENS,
                    "messages": messages,
                }),
            }
        }
    }

    /// Pull the reply text out of a provider response body
    pub fn response_text(config: &LlmConfig, body: &Value) -> Result<String, LlmError> {
        let text = if config.provider.is_openai_compatible() {
            body.pointer("/choices/0/message/content")
        } else {
            body.pointer("/content/0/text")
        };

        text.and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| LlmError::UnexpectedResponse(body.to_string()))
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = Self::build_request(&self.config, prompt);
        app_log!(
            info,
            "Sending request to {} ({})",
            self.config.provider,
            self.config.model()
        );

        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            app_log!(error, "LLM API error {}: {}", status, body);
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let text = Self::response_text(&self.config, &body)?;
        app_log!(info, "Received {} characters from {}", text.len(), self.config.provider);
        Ok(text)
    }

    pub async fn parse_interview_text(&self, text: &str) -> Result<ParsedInterview, LlmError> {
        if text.trim().is_empty() {
            return Err(LlmError::EmptyInput("invitation text"));
        }

        let output = self
            .complete(&prompts::interview_extraction_prompt(text))
            .await?;
        ParsedInterview::from_model_output(&output).inspect_err(|e| {
            app_log!(warn, "Could not parse model output ({}): {}", e, output);
        })
    }

    /// Markdown analysis of a job description
    pub async fn analyze_job_description(
        &self,
        jd: &str,
        company: &str,
        job_title: &str,
        salary: &str,
    ) -> Result<String, LlmError> {
        if jd.trim().is_empty() {
            return Err(LlmError::EmptyInput("job description"));
        }

        self.complete(&prompts::job_description_prompt(jd, company, job_title, salary))
            .await
    }

    /// True when the provider answers with any text at all
    pub async fn test_connection(config: &LlmConfig) -> bool {
        let client = match Self::new(config.clone()) {
            Ok(client) => client,
            Err(_) => return false,
        };

        match client.complete(prompts::CONNECTION_TEST_PROMPT).await {
            Ok(reply) => !reply.is_empty(),
            Err(e) => {
                app_log!(warn, "LLM connection test failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryStore;
    use crate::llm::LlmProvider;

    fn config(provider: LlmProvider) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: "sk-test".to_string(),
            model: None,
            base_url: None,
        }
    }

    #[test]
    fn test_openai_compatible_request() {
        let request = LlmClient::build_request(&config(LlmProvider::Zhipu), "hi");
        assert_eq!(request.url, "https://open.bigmodel.cn/api/paas/v4/chat/completions");
        assert_eq!(request.headers, vec![("Authorization", "Bearer sk-test".to_string())]);
        assert_eq!(request.body["model"], "glm-4-flash");
        assert_eq!(request.body["temperature"], 0.1);
        assert_eq!(request.body["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_claude_request() {
        let request = LlmClient::build_request(&config(LlmProvider::Claude), "hi");
        assert_eq!(request.url, "https://api.anthropic.com/v1/messages");
        assert!(request.headers.contains(&("x-api-key", "sk-test".to_string())));
        assert!(request
            .headers
            .contains(&("anthropic-version", "2023-06-01".to_string())));
        assert_eq!(request.body["max_tokens"], 1024);
        assert!(request.body.get("temperature").is_none());
    }

    #[test]
    fn test_response_text_per_provider() {
        let openai = json!({ "choices": [{ "message": { "role": "assistant", "content": "OK" } }] });
        assert_eq!(
            LlmClient::response_text(&config(LlmProvider::Openai), &openai).unwrap(),
            "OK"
        );

        let claude = json!({ "content": [{ "type": "text", "text": "OK" }] });
        assert_eq!(
            LlmClient::response_text(&config(LlmProvider::Claude), &claude).unwrap(),
            "OK"
        );

        assert!(matches!(
            LlmClient::response_text(&config(LlmProvider::Claude), &openai),
            Err(LlmError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_from_store_requires_config() {
        let store = MemoryStore::default();
        assert!(matches!(
            LlmClient::from_store(&store),
            Err(LlmError::NotConfigured)
        ));

        store.set_llm_config(config(LlmProvider::Qwen)).unwrap();
        let client = LlmClient::from_store(&store).unwrap();
        assert_eq!(client.config().provider, LlmProvider::Qwen);
    }

    #[tokio::test]
    async fn test_empty_inputs_rejected_before_sending() {
        let client = LlmClient::new(config(LlmProvider::Openai)).unwrap();
        assert!(matches!(
            client.parse_interview_text("   ").await,
            Err(LlmError::EmptyInput(_))
        ));
        assert!(matches!(
            client.analyze_job_description("", "Acme", "", "").await,
            Err(LlmError::EmptyInput(_))
        ));
    }
}
