//! API handlers for the web API

pub mod auth;
pub mod user;

pub use auth::login;
pub use user::{create_user, get_current_user};
