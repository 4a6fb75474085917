//! Authentication routes

use axum::{routing::post, Router};

use crate::app_state::AppState;
use crate::handlers::auth;
use crate::users::UserRepository;

/// Create authentication routes
pub fn auth_routes<R>() -> Router<AppState<R>>
where
    R: UserRepository + Clone + 'static,
{
    Router::new().route("/auth/login", post(auth::login::<R>))
}
