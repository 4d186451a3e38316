//! Startup consistency check between metadata rows and stored files

use anyhow::{Context, Result};
use docintake_core::models::ReconcileReport;
use docintake_db::Session;
use docintake_services::reconcile;
use docintake_storage::Storage;
use sqlx::SqlitePool;

/// Run the reconciliation pass before the server accepts requests.
///
/// Gaps are logged by the pass itself; only failures to run it abort startup.
pub async fn reconcile_on_startup(
    pool: &SqlitePool,
    storage: &dyn Storage,
    repair: bool,
) -> Result<ReconcileReport> {
    let mut session = Session::new(pool.clone());
    let report = reconcile(&mut session, storage, repair)
        .await
        .context("Startup reconciliation failed")?;

    if !report.is_consistent() && !repair {
        tracing::warn!("Metadata and stored files disagree; set RECONCILE_REPAIR=true to fix");
    }

    Ok(report)
}
