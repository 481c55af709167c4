use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("a real-to-elapsed offset is required to construct a REAL timestamp")]
    MissingClockOffset,
    #[error("unsupported clock domain: {0}")]
    UnsupportedClockDomain(String),
}

/// Which clock a timestamp's raw value is expressed in.
///
/// `Elapsed` counts from device boot; `Real` is wall-clock time. The two
/// are bridged by a per-trace-session offset captured at record time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockDomain {
    Elapsed,
    Real,
}

impl ClockDomain {
    /// Parse a wire tag. Unknown tags fail rather than defaulting —
    /// a trace recorded against an unrecognized clock cannot be ordered.
    pub fn from_tag(tag: &str) -> Result<Self, TimestampError> {
        match tag {
            "ELAPSED" => Ok(ClockDomain::Elapsed),
            "REAL" => Ok(ClockDomain::Real),
            other => Err(TimestampError::UnsupportedClockDomain(other.to_string())),
        }
    }
}

/// An immutable instant with an explicit clock domain.
///
/// Entries from independently-clocked sources are ordered by these; the
/// value is nanoseconds on the given domain's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    domain: ClockDomain,
    value_ns: i64,
}

impl Timestamp {
    pub fn new(domain: ClockDomain, value_ns: i64) -> Self {
        Self { domain, value_ns }
    }

    pub fn elapsed(value_ns: i64) -> Self {
        Self::new(ClockDomain::Elapsed, value_ns)
    }

    pub fn real(value_ns: i64) -> Self {
        Self::new(ClockDomain::Real, value_ns)
    }

    /// Construct from an elapsed clock reading. For the `Real` domain the
    /// per-session `real_to_elapsed_offset_ns` is mandatory and is added
    /// to the elapsed value; this mapping is fixed for the lifetime of a
    /// loaded trace.
    pub fn from_elapsed(
        domain: ClockDomain,
        elapsed_ns: i64,
        real_to_elapsed_offset_ns: Option<i64>,
    ) -> Result<Self, TimestampError> {
        match domain {
            ClockDomain::Elapsed => Ok(Self::elapsed(elapsed_ns)),
            ClockDomain::Real => {
                let offset = real_to_elapsed_offset_ns.ok_or(TimestampError::MissingClockOffset)?;
                Ok(Self::real(elapsed_ns + offset))
            }
        }
    }

    pub fn domain(&self) -> ClockDomain {
        self.domain
    }

    pub fn value_ns(&self) -> i64 {
        self.value_ns
    }
}

/// Numeric coercion for arithmetic against raw nanosecond values.
impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> i64 {
        ts.value_ns
    }
}

impl PartialOrd for Timestamp {
    /// Total order within one domain; timestamps on different clocks are
    /// not comparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.domain == other.domain {
            Some(self.value_ns.cmp(&other.value_ns))
        } else {
            None
        }
    }
}
