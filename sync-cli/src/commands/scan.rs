//! Build and summarize the current snapshot.

use anyhow::Result;
use sync_types::Snapshot;

use super::{describe, scan_current};
use crate::config::AppConfig;

/// Run the scan command.
pub async fn run(app: &AppConfig, list: bool) -> Result<()> {
    let snapshot = scan_current(app).await?;
    print!("{}", render(&snapshot, list));
    Ok(())
}

fn render(snapshot: &Snapshot, list: bool) -> String {
    let mut out = format!(
        "Profile {}: {} roots, {} items\n",
        snapshot.key(),
        snapshot.roots().count(),
        snapshot.item_count()
    );
    for root in snapshot.roots() {
        out.push_str(&format!("  {} ({} items)\n", root.name(), root.len()));
        if list {
            for item in root.items() {
                out.push_str(&format!("    {}\n", describe(item)));
            }
        }
    }
    out
}
