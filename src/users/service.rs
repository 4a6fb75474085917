//! User service
//!
//! Registration and profile lookup on top of the user store.

use thiserror::Error;

use crate::auth::{HashError, PasswordHasher};
use crate::db::{StoreError, UnitOfWork};
use crate::models::{CreateUserRequest, NewUser, User};

use super::repository::UserRepository;

/// User service errors
#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Storage error: {0}")]
    Storage(StoreError),

    #[error("Credential error: {0}")]
    Credential(#[from] HashError),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => UserError::EmailTaken,
            other => UserError::Storage(other),
        }
    }
}

pub struct UserService<R, H> {
    users: R,
    hasher: H,
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + Clone + 'static,
{
    pub fn new(users: R, hasher: H) -> Self {
        Self { users, hasher }
    }

    /// Hash the password and persist a new user
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, request: CreateUserRequest) -> Result<User, UserError> {
        let CreateUserRequest {
            name,
            email,
            password,
        } = request;

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| HashError::HashingFailed(e.to_string()))??;

        let mut unit = self.users.begin().await?;
        let user = self
            .users
            .create(
                &mut unit,
                NewUser {
                    name,
                    email,
                    password_hash,
                },
            )
            .await?;
        unit.commit().await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Load a live user by id
    pub async fn get_user(&self, id: i64) -> Result<User, UserError> {
        let mut unit = self.users.begin().await?;
        let user = self.users.find_by_id(&mut unit, id).await?;
        unit.commit().await?;

        user.ok_or(UserError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BcryptHasher;
    use crate::users::InMemoryUserRepository;

    fn service(repo: InMemoryUserRepository) -> UserService<InMemoryUserRepository, BcryptHasher> {
        UserService::new(repo, BcryptHasher::new(4))
    }

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let repo = InMemoryUserRepository::new();
        let user = service(repo.clone())
            .register(request("a@x.com"))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "secret");
        assert!(BcryptHasher::new(4)
            .verify("secret", &user.password_hash)
            .unwrap());
        assert_eq!(repo.open_units(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let svc = service(InMemoryUserRepository::new());
        svc.register(request("a@x.com")).await.unwrap();

        let err = svc.register(request("a@x.com")).await.unwrap_err();
        assert!(matches!(err, UserError::EmailTaken));
    }

    #[tokio::test]
    async fn test_get_user() {
        let repo = InMemoryUserRepository::new();
        let svc = service(repo.clone());
        let user = svc.register(request("a@x.com")).await.unwrap();

        assert_eq!(svc.get_user(user.id).await.unwrap().email, "a@x.com");

        repo.soft_delete(user.id).unwrap();
        assert!(matches!(
            svc.get_user(user.id).await,
            Err(UserError::NotFound)
        ));
    }
}
