//! Authentication service
//!
//! Core business logic for credential authentication: resolve the user, verify
//! the password, mint a one-hour access token. The service is stateless and
//! consumes the user store, hasher and token issuer only through their traits.

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::db::{StoreError, UnitOfWork};
use crate::models::{AuthenticationRequest, IssuedSession, TokenClaims};
use crate::users::UserRepository;

use super::jwt::{TokenError, TokenIssuer};
use super::password::{HashError, PasswordHasher};

/// Lifetime of every access token issued at login
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 1;

/// Plaintext behind the decoy hash checked when no user matches the email
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Auth service errors
///
/// `UserNotFound` and `WrongPassword` stay distinct here for logs and tests;
/// the API layer collapses them into one response.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Credential error: {0}")]
    Credential(#[from] HashError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl AuthError {
    /// True for the outcomes caused by the presented credentials
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, AuthError::UserNotFound | AuthError::WrongPassword)
    }
}

/// Authentication service
pub struct AuthService<R, H, T> {
    users: R,
    hasher: H,
    tokens: T,
    audience: String,
    token_kind: String,
    decoy_hash: Option<String>,
}

impl<R, H, T> AuthService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher + Clone + 'static,
    T: TokenIssuer,
{
    /// Create a new AuthService
    pub fn new(users: R, hasher: H, tokens: T, config: &AuthConfig) -> Self {
        // Same work factor as stored hashes, so a miss costs what a mismatch does
        let decoy_hash = hasher
            .hash(DECOY_PASSWORD)
            .map_err(|e| tracing::warn!(error = %e, "Could not prepare decoy password hash"))
            .ok();

        Self {
            users,
            hasher,
            tokens,
            audience: config.audience.clone(),
            token_kind: config.token_kind.clone(),
            decoy_hash,
        }
    }

    /// Turn an email/password pair into an issued session
    #[tracing::instrument(skip_all)]
    pub async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> Result<IssuedSession, AuthError> {
        let AuthenticationRequest { email, password } = request;

        // The unit only covers the lookup; it is released before hashing starts
        let mut unit = self.users.begin().await?;
        let user = self.users.find_by_email(&mut unit, &email).await?;
        unit.commit().await?;

        let Some(user) = user else {
            self.verify_decoy(password).await;
            tracing::warn!("Authentication rejected: no live user for email");
            return Err(AuthError::UserNotFound);
        };

        let hasher = self.hasher.clone();
        let stored_hash = user.password_hash.clone();
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| HashError::HashingFailed(e.to_string()))?
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                e
            })?;

        if !matched {
            tracing::warn!(user_id = %user.id, "Authentication rejected: wrong password");
            return Err(AuthError::WrongPassword);
        }

        let expires_at = Utc::now() + Duration::hours(ACCESS_TOKEN_TTL_HOURS);
        let claims = TokenClaims {
            subject_id: user.id,
            audience: self.audience.clone(),
            expires_at,
        };

        let access_token = self.tokens.generate_token(&claims).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to sign access token");
            e
        })?;

        tracing::info!(user_id = %user.id, expires_at = %expires_at, "User authenticated");

        Ok(IssuedSession {
            access_token,
            kind: self.token_kind.clone(),
            expires_at,
        })
    }

    /// Run one verification against the decoy hash and discard the outcome
    async fn verify_decoy(&self, password: String) {
        let Some(decoy_hash) = self.decoy_hash.clone() else {
            return;
        };
        let hasher = self.hasher.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify(&password, &decoy_hash)).await;
    }
}
