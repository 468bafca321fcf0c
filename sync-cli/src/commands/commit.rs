//! Store the current snapshot as the new base.

use anyhow::{Context, Result};
use sync_store::SnapshotPersister;

use super::{blocking, scan_current};
use crate::config::AppConfig;

/// Run the commit command.
pub async fn run(app: &AppConfig) -> Result<()> {
    let snapshot = scan_current(app).await?;
    let items = snapshot.item_count();

    let persister = app.persister.clone();
    let name = app.base_name();
    let stored = name.clone();
    blocking(move || {
        persister
            .store(&stored, &snapshot)
            .with_context(|| format!("Failed to store base snapshot {stored}"))
    })
    .await?;

    tracing::info!("Committed {} items as {}", items, name);
    println!("Committed {} items as {}", items, name);
    Ok(())
}
