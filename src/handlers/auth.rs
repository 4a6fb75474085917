//! Authentication HTTP handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthenticationRequest, IssuedSession};
use crate::users::UserRepository;

/// POST /auth/login - Exchange email and password for an access token
pub async fn login<R>(
    State(state): State<AppState<R>>,
    Json(req): Json<AuthenticationRequest>,
) -> ApiResult<Json<IssuedSession>>
where
    R: UserRepository + Clone + 'static,
{
    req.validate()?;

    // Dropping the future on timeout aborts any in-flight store call
    let session = tokio::time::timeout(state.auth_timeout, state.auth_service.authenticate(req))
        .await
        .map_err(|_| ApiError::ServiceUnavailable("Authentication timed out".to_string()))??;

    Ok(Json(session))
}
