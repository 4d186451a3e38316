use docintake_core::models::{Document, DocumentStats, NewDocument};
use docintake_core::AppError;
use docintake_db::DocumentStore;
use docintake_storage::{Storage, StorageError};

/// An upload that passed boundary validation and is ready to persist.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub id: String,
    pub filename: String,
    pub file_type: String,
    pub data: Vec<u8>,
}

/// Insert a document and commit.
///
/// Fails with `AppError::Conflict` when the id is taken; the existing record is untouched.
/// `file_size` is trusted as given.
#[tracing::instrument(skip(store, document), fields(document.id = %document.id))]
pub async fn create<S>(store: &mut S, document: NewDocument) -> Result<Document, AppError>
where
    S: DocumentStore + ?Sized,
{
    let created = store.insert(&document).await?;
    store.commit().await?;

    tracing::info!(
        document_id = %created.id,
        file_type = %created.file_type,
        file_size = created.file_size,
        "Document created"
    );

    Ok(created)
}

/// Write the bytes, then record the metadata.
///
/// If recording fails the file just written is removed again, so a failed upload
/// leaves neither a row nor a file behind.
#[tracing::instrument(skip(store, storage, file), fields(document.id = %file.id, size_bytes = file.data.len()))]
pub async fn upload<S>(
    store: &mut S,
    storage: &dyn Storage,
    file: UploadedFile,
) -> Result<Document, AppError>
where
    S: DocumentStore + ?Sized,
{
    let file_size = i64::try_from(file.data.len()).map_err(|_| {
        AppError::PayloadTooLarge("File size does not fit in a signed 64-bit integer".to_string())
    })?;

    let file_path = storage.upload(&file.id, file.data).await?;

    let record = NewDocument {
        id: file.id,
        filename: file.filename,
        file_path: file_path.clone(),
        file_type: file.file_type,
        file_size,
    };

    match create(store, record).await {
        Ok(document) => Ok(document),
        Err(err) => {
            match storage.delete(&file_path).await {
                Ok(_) => {
                    tracing::debug!(
                        file_path = %file_path,
                        "Removed file after failed metadata insert"
                    );
                }
                Err(cleanup_err) => {
                    tracing::error!(
                        error = %cleanup_err,
                        file_path = %file_path,
                        "Failed to remove file after failed metadata insert; file is orphaned"
                    );
                }
            }
            Err(err)
        }
    }
}

/// All live documents. Order is not part of the contract.
pub async fn list<S>(store: &mut S) -> Result<Vec<Document>, AppError>
where
    S: DocumentStore + ?Sized,
{
    store.fetch_all().await
}

pub async fn get_by_id<S>(store: &mut S, id: &str) -> Result<Option<Document>, AppError>
where
    S: DocumentStore + ?Sized,
{
    store.fetch_by_id(id).await
}

pub async fn exists<S>(store: &mut S, id: &str) -> Result<bool, AppError>
where
    S: DocumentStore + ?Sized,
{
    Ok(store.fetch_by_id(id).await?.is_some())
}

/// Delete a document's file and row.
///
/// Returns `false` without side effects when the id is unknown. A file that is
/// already gone, or a recorded path outside the storage root, is tolerated and only
/// the row is removed. Any other storage failure aborts before the row is touched.
#[tracing::instrument(skip(store, storage), fields(document.id = %id))]
pub async fn delete<S>(store: &mut S, storage: &dyn Storage, id: &str) -> Result<bool, AppError>
where
    S: DocumentStore + ?Sized,
{
    let Some(document) = store.fetch_by_id(id).await? else {
        tracing::debug!(document_id = %id, "Document not found; nothing to delete");
        return Ok(false);
    };

    match storage.delete(&document.file_path).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(
                document_id = %id,
                file_path = %document.file_path,
                "Stored file was already missing; removing metadata only"
            );
        }
        Err(StorageError::InvalidPath(msg)) => {
            tracing::warn!(
                document_id = %id,
                file_path = %document.file_path,
                error = %msg,
                "Recorded file path is outside the storage root; removing metadata only"
            );
        }
        Err(e) => return Err(e.into()),
    }

    let row_removed = store.remove(id).await?;
    store.commit().await?;

    if row_removed {
        tracing::info!(document_id = %id, "Document deleted");
    } else {
        tracing::debug!(document_id = %id, "Row removed concurrently");
    }

    Ok(row_removed)
}

pub async fn count<S>(store: &mut S) -> Result<i64, AppError>
where
    S: DocumentStore + ?Sized,
{
    store.count().await
}

/// Sum of `file_size` over live documents; 0 when there are none.
pub async fn total_size<S>(store: &mut S) -> Result<i64, AppError>
where
    S: DocumentStore + ?Sized,
{
    store.total_size().await
}

pub async fn stats<S>(store: &mut S) -> Result<DocumentStats, AppError>
where
    S: DocumentStore + ?Sized,
{
    let total_documents = count(store).await?;
    let total_size_bytes = total_size(store).await?;
    Ok(DocumentStats::new(total_documents, total_size_bytes))
}
