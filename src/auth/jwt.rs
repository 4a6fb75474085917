//! JWT token generation and validation
//!
//! Access tokens are HS256-signed and self-contained: any holder of the secret
//! can check integrity, audience and expiry without contacting the issuer.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::TokenClaims;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Signing key is not configured")]
    MissingSigningKey,

    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims embedded in every access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Intended relying party
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID, unique per issuance
    pub jti: String,
}

impl AccessClaims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub
            .parse::<i64>()
            .map_err(|e| TokenError::InvalidToken(e.to_string()))
    }
}

/// Produces signed, time-bound tokens
pub trait TokenIssuer: Send + Sync {
    fn generate_token(&self, claims: &TokenClaims) -> Result<String, TokenError>;
}

impl<T: TokenIssuer + ?Sized> TokenIssuer for Arc<T> {
    fn generate_token(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        (**self).generate_token(claims)
    }
}

impl<T: TokenIssuer + ?Sized> TokenIssuer for &T {
    fn generate_token(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        (**self).generate_token(claims)
    }
}

/// HMAC-signed JWT issuer and verifier
pub struct JwtTokenIssuer {
    secret: String,
    audience: String,
}

impl JwtTokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            audience: config.audience.clone(),
        }
    }

    fn signing_secret(&self) -> Result<&[u8], TokenError> {
        if self.secret.trim().is_empty() {
            return Err(TokenError::MissingSigningKey);
        }
        Ok(self.secret.as_bytes())
    }

    /// Verify and decode an access token issued for this audience
    ///
    /// # Returns
    /// * `Ok(AccessClaims)` if signature, audience and expiry all check out
    /// * `Err(TokenError)` otherwise
    pub fn verify_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "sub"]);

        let token_data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.signing_secret()?),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidSignature => {
                TokenError::InvalidToken(e.to_string())
            }
            _ => TokenError::DecodingFailed(e.to_string()),
        })?;

        Ok(token_data.claims)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn generate_token(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let secret = self.signing_secret()?;

        let claims = AccessClaims {
            sub: claims.subject_id.to_string(),
            aud: claims.audience.clone(),
            iat: Utc::now().timestamp(),
            exp: claims.expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }
}
