//! Postgres-backed user store

use async_trait::async_trait;

use crate::db::{Database, PgUnitOfWork, StoreError};
use crate::models::{NewUser, User};

use super::repository::UserRepository;

/// User store over the `users` table
#[derive(Clone)]
pub struct PgUserRepository {
    db: Database,
}

impl PgUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    type Unit = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, StoreError> {
        self.db.begin().await
    }

    async fn find_by_id(
        &self,
        unit: &mut PgUnitOfWork,
        id: i64,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(unit.connection())
        .await
        .map_err(|e| {
            tracing::error!(user_id = %id, error = %e, "Failed to look up user by id");
            StoreError::from(e)
        })?;

        Ok(user)
    }

    async fn find_by_email(
        &self,
        unit: &mut PgUnitOfWork,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(unit.connection())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to look up user by email");
            StoreError::from(e)
        })?;

        Ok(user)
    }

    async fn create(
        &self,
        unit: &mut PgUnitOfWork,
        new_user: NewUser,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(unit.connection())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create user");
            StoreError::from(e)
        })?;

        Ok(user)
    }
}
