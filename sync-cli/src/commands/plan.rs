//! Reconcile the stored base against the current snapshot.

use anyhow::{Context, Result};
use sync_core::{Generator, Plan};
use sync_store::{SnapshotPersister, StoreError};
use sync_types::Snapshot;

use super::{blocking, scan_current};
use crate::config::AppConfig;

/// Run the plan command.
pub async fn run(app: &AppConfig, join: Option<&str>) -> Result<()> {
    let plan = build(app, join).await?;

    if plan.is_empty() {
        println!("No modifications.");
    } else {
        print!("{}", plan);
        println!(
            "{} modifications ({} pulls, {} pushes)",
            plan.len(),
            plan.pulls().count(),
            plan.pushes().count()
        );
    }
    Ok(())
}

/// Load the base and optional reference, scan, and reconcile.
pub(crate) async fn build(app: &AppConfig, join: Option<&str>) -> Result<Plan> {
    let base = load_base(app).await?;

    let generator = match join {
        Some(name) => {
            let persister = app.persister.clone();
            let name = name.to_string();
            let reference = blocking(move || {
                persister
                    .load(&name)
                    .with_context(|| format!("Failed to load reference snapshot {name}"))
            })
            .await?;
            Generator::join(app.policy, reference)
        }
        None => Generator::merge(app.policy),
    };

    let current = scan_current(app).await?;
    let plan = generator.reconcile(&base, &current);
    tracing::info!(
        "Reconciled {} against {}: {} modifications",
        app.key,
        base.name(),
        plan.len()
    );
    Ok(plan)
}

/// Load the stored base, or an empty one if nothing was committed yet.
pub(crate) async fn load_base(app: &AppConfig) -> Result<Snapshot> {
    let persister = app.persister.clone();
    let name = app.base_name();
    let key = app.key.clone();
    blocking(move || match persister.load(&name) {
        Ok(snapshot) => Ok(snapshot),
        Err(StoreError::NotFound { .. }) => {
            tracing::debug!("No base snapshot {}, starting empty", name);
            Ok(Snapshot::new(key))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load base snapshot {name}")),
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{commit, test_support};
    use std::fs;
    use sync_core::{ModificationKind, Policy};
    use tempfile::tempdir;

    fn kinds(plan: &Plan) -> Vec<(ModificationKind, String)> {
        plan.iter()
            .map(|m| (m.kind(), m.item().relative_path().to_string()))
            .collect()
    }

    #[tokio::test]
    async fn first_plan_pushes_everything() {
        let dir = tempdir().unwrap();
        let app = test_support::app(dir.path());
        fs::write(dir.path().join("farm/item1"), b"1").unwrap();

        let plan = build(&app, None).await.unwrap();
        assert_eq!(
            kinds(&plan),
            vec![(ModificationKind::PushToCluster, "item1".to_string())]
        );
    }

    #[tokio::test]
    async fn committed_state_plans_nothing() {
        let dir = tempdir().unwrap();
        let app = test_support::app(dir.path());
        fs::write(dir.path().join("farm/item1"), b"1").unwrap();

        commit::run(&app).await.unwrap();
        assert!(build(&app, None).await.unwrap().is_empty());
        assert!(run(&app, None).await.is_ok());
    }

    #[tokio::test]
    async fn local_deletion_follows_policy() {
        let dir = tempdir().unwrap();
        let mut app = test_support::app(dir.path());
        fs::write(dir.path().join("farm/item1"), b"1").unwrap();
        commit::run(&app).await.unwrap();
        fs::remove_file(dir.path().join("farm/item1")).unwrap();

        // Removals trusted: the deletion is simply not reported back.
        assert!(build(&app, None).await.unwrap().is_empty());

        app.policy = Policy::default().with_merge_removals(false);
        assert_eq!(
            kinds(&build(&app, None).await.unwrap()),
            vec![(ModificationKind::PullFromCluster, "item1".to_string())]
        );
    }

    #[tokio::test]
    async fn join_requires_stored_reference() {
        let dir = tempdir().unwrap();
        let app = test_support::app(dir.path());

        assert!(build(&app, Some("cluster")).await.is_err());

        let reference = Snapshot::new(app.key.clone());
        app.persister.store("cluster", &reference).unwrap();
        assert!(build(&app, Some("cluster")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_base_is_empty() {
        let dir = tempdir().unwrap();
        let app = test_support::app(dir.path());
        let base = load_base(&app).await.unwrap();
        assert_eq!(base.key(), &app.key);
        assert_eq!(base.item_count(), 0);
    }

    #[tokio::test]
    async fn corrupt_base_is_an_error() {
        let dir = tempdir().unwrap();
        let app = test_support::app(dir.path());
        let path = app.persister.path_for(&app.base_name()).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{ not json").unwrap();

        assert!(load_base(&app).await.is_err());
    }
}
