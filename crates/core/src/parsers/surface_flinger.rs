use serde::Deserialize;

use crate::model::{LayersSnapshot, TraceEntry};
use crate::parsers::{EntryStore, ParseError, Parser, strip_magic};
use crate::timestamp::Timestamp;
use crate::trace_type::TraceType;

pub const MAGIC: &[u8] = b"\x09LYRTRACE";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayersFile {
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
    snapshot: LayersSnapshot,
}

/// Parser for compositor layer snapshots. Each entry is one full layer
/// tree; a snapshot decodes atomically.
#[derive(Debug)]
pub struct SurfaceFlingerParser {
    store: EntryStore,
}

impl SurfaceFlingerParser {
    pub fn try_parse(data: &[u8]) -> Result<Self, ParseError> {
        let payload = strip_magic(data, MAGIC)?;
        let file: LayersFile = serde_json::from_slice(payload)
            .map_err(|e| ParseError::decode(TraceType::SurfaceFlinger, &e))?;

        let pairs = file
            .entries
            .into_iter()
            .map(|e| (e.elapsed_ns, TraceEntry::Layers(e.snapshot)))
            .collect();
        let store = EntryStore::from_elapsed(pairs, file.real_to_elapsed_time_offset_ns)?;
        Ok(Self { store })
    }
}

impl Parser for SurfaceFlingerParser {
    fn trace_type(&self) -> TraceType {
        TraceType::SurfaceFlinger
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
    use crate::timestamp::ClockDomain;

    fn buffer(json: &str) -> Vec<u8> {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(json.as_bytes());
        data
    }

    #[test]
    fn parses_layer_snapshots() {
        let data = buffer(
            r#"{
                "realToElapsedTimeOffsetNs": 500,
                "entries": [
                    {
                        "elapsedNs": 100,
                        "displays": [
                            {"id": 1, "layerStack": 0, "size": {"w": 1080, "h": 2400},
                             "name": "Built-in Screen"}
                        ],
                        "layers": [
                            {"id": 7, "name": "Wallpaper", "parent": -1,
                             "zOrderPath": [0], "layerStack": 0,
                             "bounds": {"left": 0, "top": 0, "right": 1080, "bottom": 2400},
                             "screenBounds": {"left": 0, "top": 0, "right": 1080, "bottom": 2400},
                             "isComputedVisible": true}
                        ]
                    },
                    {"elapsedNs": 200, "displays": [], "layers": []}
                ]
            }"#,
        );

        let parser = SurfaceFlingerParser::try_parse(&data).unwrap();
        assert_eq!(parser.trace_type(), TraceType::SurfaceFlinger);
        assert_eq!(parser.timestamps().len(), 2);
        assert_eq!(parser.timestamps()[0].domain(), ClockDomain::Real);
        assert_eq!(parser.timestamps()[0].value_ns(), 600);

        let TraceEntry::Layers(snapshot) = parser.entry(parser.timestamps()[0]).unwrap() else {
            unreachable!("surface flinger entries are layer snapshots");
        };
        assert_eq!(snapshot.displays.len(), 1);
        assert_eq!(snapshot.displays[0].name.as_deref(), Some("Built-in Screen"));
        assert_eq!(snapshot.layers[0].id, 7);
        assert_eq!(snapshot.layers[0].z_order_path, [0]);
        assert!(snapshot.layers[0].is_computed_visible);
    }

    #[test]
    fn timestamps_agree_with_entries() {
        let data = buffer(
            r#"{"entries": [
                {"elapsedNs": 300, "layers": []},
                {"elapsedNs": 100, "layers": []},
                {"elapsedNs": 200, "layers": []}
            ]}"#,
        );
        let parser = SurfaceFlingerParser::try_parse(&data).unwrap();

        let timestamps = parser.timestamps();
        assert_eq!(timestamps.len(), parser.entries().len());
        assert!(timestamps.windows(2).all(|w| w[0].value_ns() <= w[1].value_ns()));
        for (i, ts) in timestamps.iter().enumerate() {
            assert_eq!(parser.entry(*ts).unwrap(), &parser.entries()[i]);
        }
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let data = buffer(r#"{"entries": [{"elapsedNs": "not a number"}]}"#);
        let err = SurfaceFlingerParser::try_parse(&data).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Decode {
                trace_type: TraceType::SurfaceFlinger,
                ..
            }
        ));
    }
}
