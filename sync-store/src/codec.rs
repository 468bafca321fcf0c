//! Encoding of [`SnapshotRecord`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sync_types::Snapshot;

use crate::record::{SnapshotRecord, VersionProbe, FORMAT_VERSION};
use crate::StoreError;

/// Self-describing encodings for persisted snapshots.
///
/// MessagePack records are written with named fields so both encodings
/// carry their field names and can be inspected without a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// MessagePack with named fields.
    #[serde(alias = "messagepack")]
    Msgpack,
}

impl Format {
    /// File extension used by this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Msgpack => "msgpack",
        }
    }

    /// Encode a snapshot.
    pub fn encode(&self, snapshot: &Snapshot) -> Result<Vec<u8>, StoreError> {
        let record = SnapshotRecord::from(snapshot);
        let encoded = match self {
            Self::Json => serde_json::to_vec_pretty(&record).map_err(|e| e.to_string()),
            Self::Msgpack => rmp_serde::to_vec_named(&record).map_err(|e| e.to_string()),
        };
        encoded.map_err(|reason| StoreError::Encode {
            name: snapshot.name().to_string(),
            reason,
        })
    }

    /// Decode a snapshot. `name` is only used for error reporting.
    pub fn decode(&self, name: &str, bytes: &[u8]) -> Result<Snapshot, StoreError> {
        let probe: VersionProbe = self.decode_as(name, bytes)?;
        if probe.format_version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: probe.format_version,
                supported: FORMAT_VERSION,
            });
        }
        let record: SnapshotRecord = self.decode_as(name, bytes)?;
        record.into_snapshot()
    }

    fn decode_as<T>(&self, name: &str, bytes: &[u8]) -> Result<T, StoreError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let decoded = match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Self::Msgpack => rmp_serde::from_slice(bytes).map_err(|e| e.to_string()),
        };
        decoded.map_err(|reason| StoreError::Decode {
            name: name.to_string(),
            reason,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "msgpack" | "messagepack" => Ok(Self::Msgpack),
            other => Err(format!("unknown snapshot format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_types::{Item, NodeId, ProfileKey, RelativePath, Root};

    fn sample() -> Snapshot {
        let node = NodeId::new("localhost").unwrap();
        Snapshot::with_roots(
            ProfileKey::new("default", "localhost", "farm"),
            [
                Root::with_items(
                    "farm",
                    [Item::file(RelativePath::new("item1").unwrap(), node, 1)],
                ),
                Root::new("empty"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn json_is_self_describing() {
        let bytes = Format::Json.encode(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"format_version\": 1"));
        assert!(text.contains("\"relative_path\": \"item1\""));
        assert!(text.contains("\"originating_node\": \"localhost\""));
    }

    #[test]
    fn msgpack_carries_field_names() {
        let bytes = Format::Msgpack.encode(&sample()).unwrap();
        let needle = b"relative_path";
        assert!(bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn both_formats_decode_what_they_encode() {
        for format in [Format::Json, Format::Msgpack] {
            let bytes = format.encode(&sample()).unwrap();
            assert_eq!(format.decode("farm", &bytes).unwrap(), sample());
        }
    }

    #[test]
    fn garbage_is_decode_error() {
        for format in [Format::Json, Format::Msgpack] {
            let err = format.decode("farm", b"\xff\x00not a snapshot").unwrap_err();
            assert!(matches!(err, StoreError::Decode { .. }), "{format}: {err}");
        }
    }

    #[test]
    fn newer_version_is_reported_before_schema_errors() {
        let bytes = br#"{"format_version": 9, "layout": "from the future"}"#;
        let err = Format::Json.decode("farm", bytes).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion {
                found: 9,
                supported: 1
            }
        ));
    }

    #[test]
    fn missing_optional_flags_default_to_false() {
        let bytes = br#"{
            "format_version": 1,
            "implementation": "contentsync.snapshot",
            "domain": "default",
            "server": "localhost",
            "name": "farm",
            "components": [
                {"name": "farm", "items": [
                    {"relative_path": "a", "originating_node": "n1", "timestamp": 4}
                ]}
            ]
        }"#;
        let snapshot = Format::Json.decode("farm", bytes).unwrap();
        let item = snapshot
            .root("farm")
            .and_then(|r| r.item_at(&RelativePath::new("a").unwrap()))
            .unwrap();
        assert!(!item.is_directory());
        assert!(!item.is_removed());
        assert_eq!(item.timestamp(), 4);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("MessagePack".parse::<Format>().unwrap(), Format::Msgpack);
        assert!("xml".parse::<Format>().is_err());
    }
}
