// src/core/service_client.rs
//! HTTP client for the OfferMatrix backend

use anyhow::Context;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::session;
use crate::core::state_store::ConfigStore;
use crate::types::ApiErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not logged in or session expired{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Unauthorized { message: Option<String> },
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("state store error: {0}")]
    Store(String),
}

impl ApiError {
    /// Backend-provided message when there is one, otherwise the generic text
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message: Some(m) } | ApiError::Status { message: Some(m), .. } => {
                m.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn ConfigStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        store: Arc<dyn ConfigStore>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Request builder with the bearer token attached when a usable one is stored
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.client.request(method, self.url(endpoint));
        match self.current_token()? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    fn current_token(&self) -> Result<Option<String>, ApiError> {
        let token = self
            .store
            .token()
            .map_err(|e| ApiError::Store(e.to_string()))?;

        match token {
            Some(token) if session::token_usable(&token) => Ok(Some(token)),
            Some(_) => {
                app_log!(info, "Stored session token has expired, dropping it");
                self.invalidate_session();
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn invalidate_session(&self) {
        if let Err(e) = self.store.clear_session() {
            app_log!(error, "Failed to clear stored session: {}", e);
        }
    }

    /// Send and decode a JSON body
    pub(crate) async fn send<R>(&self, builder: RequestBuilder) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        app_log!(trace, "{} -> {}", url, status);

        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str::<R>(&body).map_err(|e| {
                app_log!(error, "Unexpected response from {}: {}", url, body);
                ApiError::Decode(e.to_string())
            });
        }

        let message = ApiErrorBody::decode(&body);
        if status == StatusCode::UNAUTHORIZED {
            app_log!(warn, "Backend rejected credentials for {}", url);
            self.invalidate_session();
            return Err(ApiError::Unauthorized { message });
        }

        app_log!(error, "Backend error {} from {}: {}", status, url, body);
        Err(ApiError::Status { status, message })
    }
}
