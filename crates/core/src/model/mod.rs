pub mod layers;
pub mod log;
pub mod window;

pub use layers::{DisplayState, LayerState, LayersSnapshot};
pub use log::LogMessage;
pub use window::{WindowContainer, WmSnapshot};

use serde::{Deserialize, Serialize};

/// One decoded record at a single timestamp. The payload is
/// format-specific; entries are immutable once decoded and owned by the
/// parser's ordered store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceEntry {
    Log(LogMessage),
    Layers(LayersSnapshot),
    WindowManager(WmSnapshot),
}
