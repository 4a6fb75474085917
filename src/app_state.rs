//! Application state shared across handlers

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use crate::auth::{AuthService, BcryptHasher, JwtTokenIssuer};
use crate::config::AuthConfig;
use crate::users::{PgUserRepository, UserRepository, UserService};

/// Login flow as wired into the server
pub type AppAuthService<R> = AuthService<R, BcryptHasher, Arc<JwtTokenIssuer>>;

/// Shared application state, generic over the user store backing it
pub struct AppState<R = PgUserRepository> {
    pub auth_service: Arc<AppAuthService<R>>,
    pub user_service: Arc<UserService<R, BcryptHasher>>,
    pub token_issuer: Arc<JwtTokenIssuer>,
    pub auth_timeout: Duration,
}

impl<R> AppState<R>
where
    R: UserRepository + Clone,
{
    pub fn new(
        users: R,
        hasher: BcryptHasher,
        auth_config: &AuthConfig,
        auth_timeout: Duration,
    ) -> Self {
        let token_issuer = Arc::new(JwtTokenIssuer::new(auth_config));

        Self {
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                hasher,
                Arc::clone(&token_issuer),
                auth_config,
            )),
            user_service: Arc::new(UserService::new(users, hasher)),
            token_issuer,
            auth_timeout,
        }
    }
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            user_service: Arc::clone(&self.user_service),
            token_issuer: Arc::clone(&self.token_issuer),
            auth_timeout: self.auth_timeout,
        }
    }
}

impl<R> FromRef<AppState<R>> for Arc<JwtTokenIssuer> {
    fn from_ref(app_state: &AppState<R>) -> Self {
        app_state.token_issuer.clone()
    }
}
