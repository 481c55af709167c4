use serde::Deserialize;

use crate::model::{LogMessage, TraceEntry};
use crate::parsers::{EntryStore, ParseError, Parser, strip_magic};
use crate::timestamp::Timestamp;
use crate::trace_type::TraceType;

pub const MAGIC: &[u8] = b"\x09PROTOLOG";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtoLogFile {
    #[serde(default)]
    real_to_elapsed_time_offset_ns: Option<i64>,
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    elapsed_ns: i64,
    #[serde(flatten)]
    message: LogMessage,
}

/// Parser for the structured log stream of the window manager.
#[derive(Debug)]
pub struct ProtoLogParser {
    store: EntryStore,
}

impl ProtoLogParser {
    pub fn try_parse(data: &[u8]) -> Result<Self, ParseError> {
        let payload = strip_magic(data, MAGIC)?;
        let file: ProtoLogFile = serde_json::from_slice(payload)
            .map_err(|e| ParseError::decode(TraceType::ProtoLog, &e))?;

        let pairs = file
            .messages
            .into_iter()
            .map(|m| (m.elapsed_ns, TraceEntry::Log(m.message)))
            .collect();
        let store = EntryStore::from_elapsed(pairs, file.real_to_elapsed_time_offset_ns)?;
        Ok(Self { store })
    }
}

impl Parser for ProtoLogParser {
    fn trace_type(&self) -> TraceType {
        TraceType::ProtoLog
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
