// src/core/session.rs
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims the backend puts in its HS256 session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub username: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

impl SessionClaims {
    /// Read the claims without checking the signature. The client has no
    /// secret; this is only used to drop tokens that have already expired.
    pub fn peek(token: &str) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(data.claims)
    }

    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        (self.exp as i64) <= now_unix
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// True when the token can still be sent. Tokens we cannot read are sent
/// as-is and left for the backend to judge.
pub fn token_usable(token: &str) -> bool {
    match SessionClaims::peek(token) {
        Ok(claims) => !claims.is_expired(),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(exp: usize) -> String {
        let claims = SessionClaims {
            user_id: 42,
            username: "alice".to_string(),
            exp,
            iat: Some(1),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-side")).unwrap()
    }

    #[test]
    fn test_peek_reads_claims_without_secret() {
        let claims = SessionClaims::peek(&token(2_000_000_000)).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_expired_at(1_700_000_000));
        assert!(claims.is_expired_at(2_000_000_000));
    }

    #[test]
    fn test_token_usable() {
        let future = (chrono::Utc::now().timestamp() + 3600) as usize;
        assert!(token_usable(&token(future)));
        assert!(!token_usable(&token(1_000)));
        assert!(token_usable("not-a-jwt"));
    }
}
