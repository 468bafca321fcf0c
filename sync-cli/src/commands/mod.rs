//! CLI command implementations.

pub mod commit;
pub mod plan;
pub mod scan;
pub mod show;

use anyhow::{Context, Result};
use sync_types::{Item, Snapshot};

use crate::config::AppConfig;
use crate::scanner::Scanner;

/// Run blocking filesystem work off the async runtime.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("Blocking task failed")?
}

/// Scan every configured root into the current snapshot.
pub(crate) async fn scan_current(app: &AppConfig) -> Result<Snapshot> {
    let scanner = Scanner::new(app.node.clone());
    let key = app.key.clone();
    let roots = app.roots.clone();
    blocking(move || {
        scanner
            .scan(key, &roots)
            .context("Failed to scan content roots")
    })
    .await
}

/// One-line rendering of an item for listings.
pub(crate) fn describe(item: &Item) -> String {
    let mut line = format!(
        "{}{} (node={}, ts={})",
        item.relative_path(),
        if item.is_directory() { "/" } else { "" },
        item.originating_node(),
        item.timestamp()
    );
    if item.is_removed() {
        line.push_str(" [removed]");
    }
    line
}
