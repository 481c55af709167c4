pub mod protolog;
pub mod surface_flinger;
pub mod window_manager;

use thiserror::Error;

use crate::model::TraceEntry;
use crate::timestamp::{ClockDomain, Timestamp, TimestampError};
use crate::trace_type::TraceType;

#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed payload; `detail` carries the failing location/field
    /// as reported by the decoder.
    #[error("{trace_type:?}: decode failed: {detail}")]
    Decode {
        trace_type: TraceType,
        detail: String,
    },
    #[error("buffer does not carry this parser's format magic")]
    UnrecognizedFormat,
    #[error("no known parser matched the buffer")]
    NoParserMatched,
    #[error("multiple parsers matched the buffer")]
    AmbiguousFormat,
    #[error("no entry at timestamp {0} ns")]
    EntryNotFound(i64),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

impl ParseError {
    pub(crate) fn decode(trace_type: TraceType, err: &serde_json::Error) -> Self {
        ParseError::Decode {
            trace_type,
            detail: err.to_string(),
        }
    }
}

/// Decodes one raw buffer of one trace format into an ordered sequence
/// of timestamped entries, with random-access lookup by timestamp.
pub trait Parser: std::fmt::Debug {
    fn trace_type(&self) -> TraceType;

    /// Non-decreasing, one per decoded entry, in decode order.
    fn timestamps(&self) -> &[Timestamp];

    /// Exact-match lookup. Fails with `EntryNotFound` when no entry
    /// carries that timestamp.
    fn entry(&self, ts: Timestamp) -> Result<&TraceEntry, ParseError>;

    /// All entries, in the same order as `timestamps()`.
    fn entries(&self) -> &[TraceEntry];
}

/// Shared ordered store behind every parser implementation: timestamps
/// and entries kept as parallel vectors, sorted together on decode.
#[derive(Debug)]
pub(crate) struct EntryStore {
    timestamps: Vec<Timestamp>,
    entries: Vec<TraceEntry>,
}

impl EntryStore {
    /// Build the store from decoded `(elapsed_ns, entry)` pairs. Entries
    /// are timestamped on the REAL clock when the session offset is
    /// known, ELAPSED otherwise, and stably sorted by value so the
    /// `timestamps()` contract holds even for unordered payloads.
    pub(crate) fn from_elapsed(
        pairs: Vec<(i64, TraceEntry)>,
        real_to_elapsed_offset_ns: Option<i64>,
    ) -> Result<Self, TimestampError> {
        let domain = if real_to_elapsed_offset_ns.is_some() {
            ClockDomain::Real
        } else {
            ClockDomain::Elapsed
        };
        let mut stamped = pairs
            .into_iter()
            .map(|(elapsed_ns, entry)| {
                let ts = Timestamp::from_elapsed(domain, elapsed_ns, real_to_elapsed_offset_ns)?;
                Ok((ts, entry))
            })
            .collect::<Result<Vec<_>, TimestampError>>()?;
        stamped.sort_by_key(|(ts, _)| ts.value_ns());

        let (timestamps, entries) = stamped.into_iter().unzip();
        Ok(Self {
            timestamps,
            entries,
        })
    }

    pub(crate) fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub(crate) fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub(crate) fn entry(&self, ts: Timestamp) -> Result<&TraceEntry, ParseError> {
        let index = self
            .timestamps
            .partition_point(|t| t.value_ns() < ts.value_ns());
        if self.timestamps.get(index) == Some(&ts) {
            Ok(&self.entries[index])
        } else {
            Err(ParseError::EntryNotFound(ts.value_ns()))
        }
    }
}

/// Split a buffer into (magic, payload), failing when the expected
/// magic is absent.
pub(crate) fn strip_magic<'a>(data: &'a [u8], magic: &[u8]) -> Result<&'a [u8], ParseError> {
    if data.starts_with(magic) {
        Ok(&data[magic.len()..])
    } else {
        Err(ParseError::UnrecognizedFormat)
    }
}

type BuildFn = fn(&[u8]) -> Result<Box<dyn Parser>, ParseError>;

struct FormatSpec {
    magic: &'static [u8],
    trace_type: TraceType,
    build: BuildFn,
}

fn build_protolog(data: &[u8]) -> Result<Box<dyn Parser>, ParseError> {
    Ok(Box::new(protolog::ProtoLogParser::try_parse(data)?))
}

fn build_surface_flinger(data: &[u8]) -> Result<Box<dyn Parser>, ParseError> {
    Ok(Box::new(surface_flinger::SurfaceFlingerParser::try_parse(
        data,
    )?))
}

fn build_window_manager(data: &[u8]) -> Result<Box<dyn Parser>, ParseError> {
    Ok(Box::new(window_manager::WindowManagerParser::try_parse(
        data,
    )?))
}

/// Static registry consulted by the detection factory, one row per wire
/// format.
static FORMATS: &[FormatSpec] = &[
    FormatSpec {
        magic: protolog::MAGIC,
        trace_type: TraceType::ProtoLog,
        build: build_protolog,
    },
    FormatSpec {
        magic: surface_flinger::MAGIC,
        trace_type: TraceType::SurfaceFlinger,
        build: build_surface_flinger,
    },
    FormatSpec {
        magic: window_manager::MAGIC,
        trace_type: TraceType::WindowManager,
        build: build_window_manager,
    },
];

/// Detect the format from the buffer's self-describing magic and decode
/// it. Zero matching formats and more than one matching format are
/// reported distinctly rather than silently picking one.
pub fn detect_parser(data: &[u8]) -> Result<Box<dyn Parser>, ParseError> {
    let matched: Vec<&FormatSpec> = FORMATS
        .iter()
        .filter(|spec| data.starts_with(spec.magic))
        .collect();
    match matched.as_slice() {
        [] => Err(ParseError::NoParserMatched),
        [spec] => {
            log::debug!("detected {:?} trace", spec.trace_type);
            (spec.build)(data)
        }
        _ => Err(ParseError::AmbiguousFormat),
    }
}
