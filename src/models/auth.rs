//! Authentication models for the web API

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::Validate;

/// Credentials presented at login. The password is never persisted or logged.
#[derive(Deserialize, Validate, Clone)]
pub struct AuthenticationRequest {
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl AuthenticationRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AuthenticationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login result
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub kind: String,
    pub expires_at: DateTime<Utc>,
}

/// Input to the token issuer, built fresh for every login
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject_id: i64,
    pub audience: String,
    pub expires_at: DateTime<Utc>,
}
