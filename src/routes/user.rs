//! User route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::user::{create_user, get_current_user};
use crate::users::UserRepository;

pub fn user_routes<R>() -> Router<AppState<R>>
where
    R: UserRepository + Clone + 'static,
{
    Router::new()
        .route("/users", post(create_user::<R>))
        .route("/users/me", get(get_current_user::<R>))
}
