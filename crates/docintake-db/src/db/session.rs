//! Per-request database session
//!
//! A [`Session`] owns a pool handle and an optional transaction. Reads run on the
//! open transaction when there is one and on the pool otherwise; the first write
//! begins the transaction, which stays open until [`Session::commit`] or
//! [`Session::rollback`].

use docintake_core::AppError;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// A transactional handle scoped to one request.
///
/// Sessions are never shared between requests.
///
/// # Example
///
/// ```ignore
/// use docintake_db::{DocumentStore, Session};
///
/// async fn example(pool: sqlx::SqlitePool, doc: NewDocument) -> Result<(), AppError> {
///     let mut session = Session::new(pool);
///     session.insert(&doc).await?;
///     session.commit().await?;
///     Ok(())
/// }
/// ```
pub struct Session {
    pub(crate) pool: SqlitePool,
    pub(crate) transaction: Option<Transaction<'static, Sqlite>>,
}

impl Session {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            transaction: None,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether a write transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Return the open transaction, beginning one if needed.
    pub(crate) async fn transaction(
        &mut self,
    ) -> Result<&mut Transaction<'static, Sqlite>, AppError> {
        if self.transaction.is_none() {
            let tx = self.pool.begin().await?;
            tracing::trace!("Began database transaction");
            self.transaction = Some(tx);
        }
        self.transaction
            .as_mut()
            .ok_or_else(|| AppError::Internal("Transaction could not be opened".to_string()))
    }

    /// Commit the open transaction. A no-op when nothing was written.
    pub async fn commit(&mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.commit().await?;
            tracing::trace!("Committed database transaction");
        }
        Ok(())
    }

    /// Roll back the open transaction. A no-op when nothing was written.
    pub async fn rollback(&mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback().await?;
            tracing::trace!("Rolled back database transaction");
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // sqlx rolls the transaction back when it is dropped
        if self.transaction.is_some() {
            tracing::warn!(
                "Session was dropped without explicit commit or rollback - rolling back"
            );
        }
    }
}
