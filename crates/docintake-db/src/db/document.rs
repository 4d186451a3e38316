//! Document metadata store: the `documents` table and its row mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docintake_core::models::{Document, NewDocument};
use docintake_core::AppError;
use sqlx::error::DatabaseError;
use sqlx::Sqlite;
use validator::Validate;

use super::session::Session;

const DOCUMENT_COLUMNS: &str = "id, filename, file_path, file_type, file_size, uploaded_at";

/// Row type for documents table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub filename: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentRow {
    pub fn into_document(self) -> Document {
        Document {
            id: self.id,
            filename: self.filename,
            file_path: self.file_path,
            file_type: self.file_type,
            file_size: self.file_size,
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Capability set of a transactional document store.
///
/// Writes are staged until [`DocumentStore::commit`]; reads observe staged writes.
#[async_trait]
pub trait DocumentStore: Send {
    /// Stage a new row. The store assigns `uploaded_at`.
    /// Fails with `AppError::Conflict` when the id is taken.
    async fn insert(&mut self, document: &NewDocument) -> Result<Document, AppError>;

    async fn fetch_all(&mut self) -> Result<Vec<Document>, AppError>;

    async fn fetch_by_id(&mut self, id: &str) -> Result<Option<Document>, AppError>;

    /// Stage removal of a row. Returns whether a row matched.
    async fn remove(&mut self, id: &str) -> Result<bool, AppError>;

    async fn count(&mut self) -> Result<i64, AppError>;

    /// Sum of `file_size` over all rows; 0 when there are none.
    async fn total_size(&mut self) -> Result<i64, AppError>;

    async fn commit(&mut self) -> Result<(), AppError>;

    async fn rollback(&mut self) -> Result<(), AppError>;
}

fn is_unique_violation(err: &dyn DatabaseError) -> bool {
    // 1555 = SQLITE_CONSTRAINT_PRIMARYKEY, 2067 = SQLITE_CONSTRAINT_UNIQUE
    err.is_unique_violation() || matches!(err.code().as_deref(), Some("1555") | Some("2067"))
}

#[async_trait]
impl DocumentStore for Session {
    #[tracing::instrument(skip(self, document), fields(db.table = "documents", db.operation = "insert", db.record_id = %document.id))]
    async fn insert(&mut self, document: &NewDocument) -> Result<Document, AppError> {
        document.validate()?;

        let uploaded_at = Utc::now();
        let sql = format!(
            "INSERT INTO documents ({DOCUMENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {DOCUMENT_COLUMNS}"
        );

        let tx = self.transaction().await?;
        let result = sqlx::query_as::<Sqlite, DocumentRow>(&sql)
            .bind(&document.id)
            .bind(&document.filename)
            .bind(&document.file_path)
            .bind(&document.file_type)
            .bind(document.file_size)
            .bind(uploaded_at)
            .fetch_one(&mut **tx)
            .await;

        match result {
            Ok(row) => Ok(row.into_document()),
            Err(sqlx::Error::Database(db_err)) if is_unique_violation(db_err.as_ref()) => {
                Session::rollback(self).await?;
                tracing::warn!(document_id = %document.id, "Document id already exists");
                Err(AppError::Conflict(format!(
                    "Document with id '{}' already exists",
                    document.id
                )))
            }
            Err(e) => {
                Session::rollback(self).await.ok();
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn fetch_all(&mut self) -> Result<Vec<Document>, AppError> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY uploaded_at, id");
        let query = sqlx::query_as::<Sqlite, DocumentRow>(&sql);
        let rows = match self.transaction.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await?,
            None => query.fetch_all(&self.pool).await?,
        };
        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", db.record_id = %id))]
    async fn fetch_by_id(&mut self, id: &str) -> Result<Option<Document>, AppError> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?");
        let query = sqlx::query_as::<Sqlite, DocumentRow>(&sql).bind(id);
        let row = match self.transaction.as_mut() {
            Some(tx) => query.fetch_optional(&mut **tx).await?,
            None => query.fetch_optional(&self.pool).await?,
        };
        Ok(row.map(DocumentRow::into_document))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "delete", db.record_id = %id))]
    async fn remove(&mut self, id: &str) -> Result<bool, AppError> {
        let tx = self.transaction().await?;
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "count"))]
    async fn count(&mut self) -> Result<i64, AppError> {
        let query = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM documents");
        let count = match self.transaction.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await?,
            None => query.fetch_one(&self.pool).await?,
        };
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "sum"))]
    async fn total_size(&mut self) -> Result<i64, AppError> {
        let query = sqlx::query_scalar::<Sqlite, i64>(
            "SELECT COALESCE(SUM(file_size), 0) FROM documents",
        );
        let total = match self.transaction.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await?,
            None => query.fetch_one(&self.pool).await?,
        };
        Ok(total)
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        Session::commit(self).await
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        Session::rollback(self).await
    }
}
