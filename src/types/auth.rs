// src/types/auth.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// Same bounds the backend enforces, checked before the round trip
    pub fn validate(&self) -> anyhow::Result<()> {
        let len = self.username.chars().count();
        if !(3..=50).contains(&len) {
            anyhow::bail!("Username must be between 3 and 50 characters");
        }
        if self.password.chars().count() < 6 {
            anyhow::bail!("Password must be at least 6 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            username: "alice".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_name = RegisterRequest {
            username: "al".to_string(),
            password: "secret1".to_string(),
        };
        assert!(short_name.validate().is_err());

        let short_pass = RegisterRequest {
            username: "alice".to_string(),
            password: "123".to_string(),
        };
        assert!(short_pass.validate().is_err());
    }
}
