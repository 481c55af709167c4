use serde::{Deserialize, Serialize};
use uiscope_geometry::Rect;

/// A node in the window manager's container hierarchy. Unlike layers,
/// containers arrive already nested; children arrays mirror the source
/// structure directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowContainer {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub bounds: Option<Rect>,
    #[serde(default)]
    pub children: Vec<WindowContainer>,
}

/// A full window-manager state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WmSnapshot {
    pub root: WindowContainer,
}
