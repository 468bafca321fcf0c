//! Print a stored snapshot.

use anyhow::{Context, Result};
use sync_store::SnapshotPersister;
use sync_types::Snapshot;

use super::{blocking, describe};
use crate::config::AppConfig;

/// Run the show command.
pub async fn run(app: &AppConfig, name: Option<&str>) -> Result<()> {
    let name = name.map(str::to_string).unwrap_or_else(|| app.base_name());

    let persister = app.persister.clone();
    let loaded = name.clone();
    let snapshot = blocking(move || {
        persister
            .load(&loaded)
            .with_context(|| format!("Failed to load snapshot {loaded}"))
    })
    .await?;

    println!("=== {} ===", name);
    print!("{}", render(&snapshot));
    Ok(())
}

fn render(snapshot: &Snapshot) -> String {
    let mut out = format!("Profile: {}\n", snapshot.key());
    for root in snapshot.roots() {
        out.push_str(&format!("{}:\n", root.name()));
        if root.is_empty() {
            out.push_str("  (empty)\n");
        }
        for item in root.items() {
            out.push_str(&format!("  {}\n", describe(item)));
        }
    }
    out
}
