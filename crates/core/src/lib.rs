pub mod computations;
pub mod model;
pub mod parsers;
pub mod timestamp;
pub mod trace_type;
pub mod tree;

pub use computations::{Computation, RectsComputation, VisibilityReasonsComputation, run_pipeline};
pub use model::TraceEntry;
pub use parsers::{ParseError, Parser, detect_parser};
pub use timestamp::{ClockDomain, Timestamp, TimestampError};
pub use trace_type::TraceType;
pub use tree::{HierarchyTreeNode, NodeProperties};
