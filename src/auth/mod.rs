//! Authentication module for the web API
//!
//! Provides credential-based authentication.
//! - bcrypt password hashing and verification
//! - Stateless JWT access tokens scoped to an audience
//! - The login flow tying both to the user store

mod jwt;
mod password;
mod service;

pub use jwt::{AccessClaims, JwtTokenIssuer, TokenError, TokenIssuer};
pub use password::{BcryptHasher, HashError, PasswordHasher};
pub use service::{AuthError, AuthService, ACCESS_TOKEN_TTL_HOURS};
