//! Unit-of-work handles
//!
//! A unit of work scopes the store calls of one request. It is finished
//! explicitly with `commit` or `rollback`; dropping it unfinished rolls back,
//! so error branches never leak a connection or an open transaction.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use super::StoreError;

/// Scoped handle over a set of storage operations
#[async_trait]
pub trait UnitOfWork: Send + Sized {
    /// Make every write performed through this unit durable
    async fn commit(self) -> Result<(), StoreError>;

    /// Discard every write performed through this unit
    async fn rollback(self) -> Result<(), StoreError>;
}

/// Postgres unit of work backed by a single transaction
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    /// Acquire a connection from the pool and open a transaction on it
    pub async fn begin(pool: &PgPool) -> Result<Self, StoreError> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// Connection to run queries on, inside the open transaction
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
