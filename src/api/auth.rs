// src/api/auth.rs
use reqwest::Method;

use crate::core::{ApiClient, ApiError};
use crate::types::{LoginRequest, LoginResponse, RegisterRequest, User};

const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_ENDPOINT: &str = "/auth/register";
const ME_ENDPOINT: &str = "/auth/me";

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and keep the issued token for later requests
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let builder = self.client.request(Method::POST, LOGIN_ENDPOINT)?.json(request);
        let response: LoginResponse = self.client.send(builder).await?;

        self.client
            .store()
            .set_session(response.token.clone(), response.user.clone())
            .map_err(|e| ApiError::Store(e.to_string()))?;

        app_log!(info, "Logged in as {}", response.user.username);
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let builder = self.client.request(Method::POST, REGISTER_ENDPOINT)?.json(request);
        let user: User = self.client.send(builder).await?;
        app_log!(info, "Registered user {}", user.username);
        Ok(user)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        let builder = self.client.request(Method::GET, ME_ENDPOINT)?;
        self.client.send(builder).await
    }

    /// Forget the stored session; LLM settings stay
    pub fn logout(&self) -> Result<(), ApiError> {
        self.client
            .store()
            .clear_session()
            .map_err(|e| ApiError::Store(e.to_string()))
    }
}
