// src/api/mod.rs
//! Typed endpoints over [`ApiClient`](crate::core::ApiClient)

pub mod applications;
pub mod auth;
pub mod interviews;

pub use applications::ApplicationApi;
pub use auth::AuthApi;
pub use interviews::InterviewApi;

use crate::core::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn applications(&self) -> ApplicationApi<'_> {
        ApplicationApi::new(self)
    }

    pub fn interviews(&self) -> InterviewApi<'_> {
        InterviewApi::new(self)
    }
}
