//! User store contract

use async_trait::async_trait;

use crate::db::{StoreError, UnitOfWork};
use crate::models::{NewUser, User};

/// Durable keyed storage of user records.
///
/// Every operation runs inside a unit of work obtained from [`UserRepository::begin`].
/// Lookups only ever see users whose `deleted_at` is unset, and report a missing
/// user as `Ok(None)` rather than an error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    type Unit: UnitOfWork;

    /// Open a unit of work for a sequence of store calls
    async fn begin(&self) -> Result<Self::Unit, StoreError>;

    /// Find a live user by id
    async fn find_by_id(&self, unit: &mut Self::Unit, id: i64)
        -> Result<Option<User>, StoreError>;

    /// Find a live user by email
    async fn find_by_email(
        &self,
        unit: &mut Self::Unit,
        email: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Persist a new user and return the full stored record
    async fn create(&self, unit: &mut Self::Unit, new_user: NewUser) -> Result<User, StoreError>;
}
