//! Route definitions for the web API

use axum::Router;

use crate::app_state::AppState;
use crate::middleware;
use crate::users::UserRepository;

mod auth;
mod user;

pub use auth::auth_routes;
pub use user::user_routes;

/// Assemble the API routes with their state and the per-request middleware
pub fn api_router<R>(state: AppState<R>) -> Router
where
    R: UserRepository + Clone + 'static,
{
    Router::new()
        .merge(auth_routes::<R>())
        .merge(user_routes::<R>())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
