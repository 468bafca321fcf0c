//! Persistence round trips through every persister and format.

use contentsync_store::{FilePersister, Format, MemoryPersister, SnapshotPersister};
use sync_types::{Item, NodeId, ProfileKey, RelativePath, Root, Snapshot};
use tempfile::tempdir;

fn path(p: &str) -> RelativePath {
    RelativePath::new(p).unwrap()
}

/// A profile with a nested hierarchy mixing live entries and tombstones
/// from several nodes, plus an empty root.
fn profile() -> Snapshot {
    let local = NodeId::new("localhost").unwrap();
    let peer = NodeId::new("192.168.0.12:1099").unwrap();

    let farm = Root::with_items(
        "farm",
        [
            Item::directory(path("app.war"), local.clone(), 100),
            Item::directory(path("app.war/WEB-INF"), local.clone(), 100),
            Item::file(path("app.war/WEB-INF/web.xml"), peer.clone(), 1_706_000_000_123),
            Item::directory(path("app.war/WEB-INF/lib"), peer.clone(), 140),
            Item::file(path("app.war/WEB-INF/lib/a.jar"), local.clone(), 141),
            Item::new(path("app.war/WEB-INF/lib/old.jar"), peer.clone(), 142, false, true),
            Item::new(path("retired.sar"), local.clone(), u64::MAX, true, true),
            Item::file(path("ds.xml"), peer, 0),
        ],
    );

    Snapshot::with_roots(
        ProfileKey::new("default", "node1", "farm-profile"),
        [farm, Root::new("deploy-hasingleton")],
    )
    .unwrap()
}

#[test]
fn file_persister_round_trips_each_format() {
    for format in [Format::Json, Format::Msgpack] {
        let dir = tempdir().unwrap();
        let persister = FilePersister::new(dir.path(), format);
        let original = profile();

        persister.store("farm-profile", &original).unwrap();
        let loaded = persister.load("farm-profile").unwrap();

        assert_eq!(loaded, original, "format {format}");
        assert!(loaded.root("deploy-hasingleton").unwrap().is_empty());
        assert_eq!(loaded.item_count(), 8);
    }
}

#[test]
fn memory_persister_round_trips() {
    let persister = MemoryPersister::with_format(Format::Msgpack);
    let original = profile();

    persister.store("farm-profile", &original).unwrap();

    assert_eq!(persister.load("farm-profile").unwrap(), original);
}

#[test]
fn reload_after_restart() {
    let dir = tempdir().unwrap();
    let original = profile();

    FilePersister::new(dir.path(), Format::Json)
        .store("farm-profile", &original)
        .unwrap();

    // A fresh persister over the same directory sees the stored value.
    let reopened = FilePersister::new(dir.path(), Format::Json);
    assert_eq!(reopened.load("farm-profile").unwrap(), original);
}

#[test]
fn names_are_independent_keys() {
    let dir = tempdir().unwrap();
    let persister = FilePersister::new(dir.path(), Format::Json);

    let first = profile();
    let second = Snapshot::new(ProfileKey::new("default", "node2", "other"));

    persister.store("first", &first).unwrap();
    persister.store("second", &second).unwrap();

    assert_eq!(persister.load("first").unwrap(), first);
    assert_eq!(persister.load("second").unwrap(), second);
    assert_eq!(persister.names().unwrap(), vec!["first", "second"]);
}

#[test]
fn loaded_snapshot_keeps_hierarchy() {
    let persister = MemoryPersister::new();
    persister.store("farm-profile", &profile()).unwrap();
    let loaded = persister.load("farm-profile").unwrap();

    let farm = loaded.root("farm").unwrap();
    let lib = path("app.war/WEB-INF/lib");
    let children: Vec<(String, bool)> = farm
        .children(&lib)
        .map(|i| (i.relative_path().to_string(), i.is_removed()))
        .collect();

    assert_eq!(
        children,
        vec![
            ("app.war/WEB-INF/lib/a.jar".to_string(), false),
            ("app.war/WEB-INF/lib/old.jar".to_string(), true),
        ]
    );
}
