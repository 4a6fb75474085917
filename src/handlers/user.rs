//! User-related API handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateUserRequest, UserResponse};
use crate::users::UserRepository;

/// POST /users - Register a new user
pub async fn create_user<R>(
    State(state): State<AppState<R>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)>
where
    R: UserRepository + Clone + 'static,
{
    req.validate()?;

    let user = state.user_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/me - Profile of the token's subject
pub async fn get_current_user<R>(
    State(state): State<AppState<R>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<UserResponse>>
where
    R: UserRepository + Clone + 'static,
{
    let user = state.user_service.get_user(user.user_id).await?;

    Ok(Json(user.into()))
}
