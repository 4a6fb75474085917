//! Password hashing and verification
//!
//! Verification is tri-state: `Ok(true)` for a match, `Ok(false)` for a
//! mismatch, and `Err` when the stored hash itself is unusable. A corrupt hash
//! is a data-integrity fault and must never be reported as a wrong password.

use thiserror::Error;

/// Errors that can occur while hashing or verifying passwords
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// One-way credential hashing
pub trait PasswordHasher: Send + Sync {
    /// Derive a storable hash from a plaintext password
    fn hash(&self, plain: &str) -> Result<String, HashError>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, plain: &str, stored_hash: &str) -> Result<bool, HashError>;
}

/// bcrypt-based hasher
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with an explicit work factor (4..=31)
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, HashError> {
        bcrypt::hash(plain, self.cost).map_err(|e| HashError::HashingFailed(e.to_string()))
    }

    fn verify(&self, plain: &str, stored_hash: &str) -> Result<bool, HashError> {
        bcrypt::verify(plain, stored_hash).map_err(|e| HashError::MalformedHash(e.to_string()))
    }
}
