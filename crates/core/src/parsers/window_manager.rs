use serde::Deserialize;

use crate::model::{TraceEntry, WmSnapshot};
use crate::parsers::{EntryStore, ParseError, Parser, strip_magic};
use crate::timestamp::Timestamp;
use crate::trace_type::TraceType;

pub const MAGIC: &[u8] = b"\x09WINTRACE";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WmFile {
    #[serde(default)]
    real_to_elapsed_time_offset_ns: Option<i64>,
    #[serde(default)]
    entries: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    elapsed_ns: i64,
    #[serde(flatten)]
    snapshot: WmSnapshot,
}

/// Parser for window-manager state snapshots.
#[derive(Debug)]
pub struct WindowManagerParser {
    store: EntryStore,
}

impl WindowManagerParser {
    pub fn try_parse(data: &[u8]) -> Result<Self, ParseError> {
        let payload = strip_magic(data, MAGIC)?;
        let file: WmFile = serde_json::from_slice(payload)
            .map_err(|e| ParseError::decode(TraceType::WindowManager, &e))?;

        let pairs = file
            .entries
            .into_iter()
            .map(|e| (e.elapsed_ns, TraceEntry::WindowManager(e.snapshot)))
            .collect();
        let store = EntryStore::from_elapsed(pairs, file.real_to_elapsed_time_offset_ns)?;
        Ok(Self { store })
    }
}

impl Parser for WindowManagerParser {
    fn trace_type(&self) -> TraceType {
        TraceType::WindowManager
    }

    fn timestamps(&self) -> &[Timestamp] {
        self.store.timestamps()
    }

    fn entry(&self, ts: Timestamp) -> Result<&TraceEntry, ParseError> {
        self.store.entry(ts)
    }

    fn entries(&self) -> &[TraceEntry] {
        self.store.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(json: &str) -> Vec<u8> {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(json.as_bytes());
        data
    }

    #[test]
    fn parses_nested_containers() {
        let data = buffer(
            r#"{"entries": [
                {"elapsedNs": 10, "root": {
                    "id": 0, "name": "RootWindowContainer", "isVisible": true,
                    "children": [
                        {"id": 5, "name": "Task=5", "isVisible": true,
                         "bounds": {"left": 0, "top": 0, "right": 1080, "bottom": 2400},
                         "children": []}
                    ]
                }}
            ]}"#,
        );

        let parser = WindowManagerParser::try_parse(&data).unwrap();
        assert_eq!(parser.trace_type(), TraceType::WindowManager);

        let TraceEntry::WindowManager(snapshot) = &parser.entries()[0] else {
            unreachable!("wm entries are wm snapshots");
        };
        assert_eq!(snapshot.root.children.len(), 1);
        assert_eq!(snapshot.root.children[0].name, "Task=5");
    }

    #[test]
    fn missing_root_is_decode_error() {
        let data = buffer(r#"{"entries": [{"elapsedNs": 10}]}"#);
        let err = WindowManagerParser::try_parse(&data).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Decode {
                trace_type: TraceType::WindowManager,
                ..
            }
        ));
    }
}
