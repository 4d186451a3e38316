use std::collections::HashSet;
use std::path::Path;

use docintake_core::models::{ReconcileReport, SizeMismatch};
use docintake_core::AppError;
use docintake_db::DocumentStore;
use docintake_storage::{Storage, StorageError};

/// Compare every row with the file it points at, and every stored file with the rows.
///
/// Reports rows whose file is missing, rows whose file length differs from the
/// recorded `file_size`, and files no row points at. With `repair`, rows with a
/// missing file are deleted and orphaned files are removed; size mismatches are
/// only reported.
///
/// Files are matched to rows by name, not by the full recorded path, so a storage
/// root spelled differently from the one the rows were written with still matches.
/// A file named after a row's id is never treated as orphaned.
///
/// Uploads in flight look like orphaned files, so repair belongs at startup before
/// the server accepts requests.
#[tracing::instrument(skip(store, storage), fields(reconcile.repair = repair))]
pub async fn reconcile<S>(
    store: &mut S,
    storage: &dyn Storage,
    repair: bool,
) -> Result<ReconcileReport, AppError>
where
    S: DocumentStore + ?Sized,
{
    let documents = store.fetch_all().await?;
    let mut report = ReconcileReport::default();
    let mut known_names: HashSet<&str> = HashSet::with_capacity(documents.len() * 2);

    for document in &documents {
        known_names.insert(document.id.as_str());
        if let Some(name) = Path::new(&document.file_path)
            .file_name()
            .and_then(|name| name.to_str())
        {
            known_names.insert(name);
        }

        match storage.content_length(&document.file_path).await {
            Ok(actual) => {
                if i64::try_from(actual).ok() != Some(document.file_size) {
                    tracing::warn!(
                        document_id = %document.id,
                        recorded = document.file_size,
                        actual,
                        "Stored file size differs from recorded size"
                    );
                    report.size_mismatches.push(SizeMismatch {
                        id: document.id.clone(),
                        recorded: document.file_size,
                        actual,
                    });
                }
            }
            Err(StorageError::NotFound(_)) => {
                tracing::warn!(
                    document_id = %document.id,
                    file_path = %document.file_path,
                    "Stored file is missing"
                );
                report.missing_files.push(document.id.clone());
            }
            Err(StorageError::InvalidPath(msg)) => {
                tracing::warn!(
                    document_id = %document.id,
                    file_path = %document.file_path,
                    error = %msg,
                    "Recorded file path is outside the storage root; skipping"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    for name in storage.list().await? {
        if !known_names.contains(name.as_str()) {
            tracing::warn!(file = %name, "Stored file has no metadata row");
            report.orphaned_files.push(name);
        }
    }

    if repair {
        for id in &report.missing_files {
            if store.remove(id).await? {
                report.rows_removed += 1;
            }
        }
        store.commit().await?;

        for name in &report.orphaned_files {
            let file_path = storage.file_path_for(name)?;
            match storage.delete(&file_path).await {
                Ok(true) => report.files_removed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, file = %name, "Failed to remove orphaned file");
                }
            }
        }
    }

    tracing::info!(
        documents = documents.len(),
        missing_files = report.missing_files.len(),
        size_mismatches = report.size_mismatches.len(),
        orphaned_files = report.orphaned_files.len(),
        rows_removed = report.rows_removed,
        files_removed = report.files_removed,
        "Reconciliation completed"
    );

    Ok(report)
}
