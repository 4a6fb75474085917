//! In-memory user store
//!
//! Mirrors the Postgres store's semantics: ids come from a sequence that is not
//! rolled back, email is unique among live users, and writes made through a unit
//! become visible to other units only after commit.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db::{StoreError, UnitOfWork};
use crate::models::{NewUser, User};

use super::repository::UserRepository;

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

impl MemoryState {
    fn live_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.email == email && !u.is_deleted())
    }
}

#[derive(Default)]
struct Shared {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
    open_units: AtomicUsize,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("user store lock poisoned".to_string()))
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

/// User store held in process memory
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    shared: Arc<Shared>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user as soft-deleted. Returns false if no live user has that id.
    pub fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.shared.lock()?;
        match state.users.get_mut(&id) {
            Some(user) if !user.is_deleted() => {
                let now = Utc::now();
                user.deleted_at = Some(now);
                user.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Simulate a storage outage: every subsequent call fails until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of units begun and not yet finished or dropped
    pub fn open_units(&self) -> usize {
        self.shared.open_units.load(Ordering::SeqCst)
    }
}

/// Unit of work over the in-memory store. Created users are staged here until commit.
pub struct MemoryUnitOfWork {
    shared: Arc<Shared>,
    staged: Vec<User>,
}

impl MemoryUnitOfWork {
    fn staged_live(&self, pred: impl Fn(&User) -> bool) -> Option<&User> {
        self.staged.iter().find(|u| !u.is_deleted() && pred(u))
    }
}

impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        self.shared.open_units.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(mut self) -> Result<(), StoreError> {
        self.shared.check_available()?;
        let staged = std::mem::take(&mut self.staged);
        let mut state = self.shared.lock()?;

        if let Some(dup) = staged.iter().find(|u| state.live_by_email(&u.email).is_some()) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                dup.email
            )));
        }

        for user in staged {
            state.users.insert(user.id, user);
        }
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), StoreError> {
        self.staged.clear();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    type Unit = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, StoreError> {
        self.shared.check_available()?;
        self.shared.open_units.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryUnitOfWork {
            shared: Arc::clone(&self.shared),
            staged: Vec::new(),
        })
    }

    async fn find_by_id(
        &self,
        unit: &mut MemoryUnitOfWork,
        id: i64,
    ) -> Result<Option<User>, StoreError> {
        self.shared.check_available()?;
        if let Some(user) = unit.staged_live(|u| u.id == id) {
            return Ok(Some(user.clone()));
        }
        let state = self.shared.lock()?;
        Ok(state.users.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn find_by_email(
        &self,
        unit: &mut MemoryUnitOfWork,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        self.shared.check_available()?;
        if let Some(user) = unit.staged_live(|u| u.email == email) {
            return Ok(Some(user.clone()));
        }
        let state = self.shared.lock()?;
        Ok(state.live_by_email(email).cloned())
    }

    async fn create(
        &self,
        unit: &mut MemoryUnitOfWork,
        new_user: NewUser,
    ) -> Result<User, StoreError> {
        self.shared.check_available()?;
        let mut state = self.shared.lock()?;

        if state.live_by_email(&new_user.email).is_some()
            || unit.staged.iter().any(|u| u.email == new_user.email)
        {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                new_user.email
            )));
        }

        state.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        unit.staged.push(user.clone());
        Ok(user)
    }
}
