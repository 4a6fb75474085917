//! Middleware for the web API
//!
//! This module provides middleware for request tracing, security headers,
//! and bearer-token authentication.

pub mod auth;
mod security;
mod tracing;

pub use auth::AuthenticatedUser;
pub use security::{hsts_header, security_headers};
pub use tracing::request_tracing;
