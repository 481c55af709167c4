use serde::{Deserialize, Serialize};
use uiscope_geometry::{Color, Rect, Size, Transform};

/// One physical or virtual display as declared by the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub id: u64,
    #[serde(default)]
    pub layer_stack: u32,
    /// The region of layer-stack space this display shows. Absent or
    /// degenerate on virtual displays that only declare a size.
    #[serde(default)]
    pub layer_stack_space_rect: Option<Rect>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub name: Option<String>,
    pub size: Size,
}

/// One layer's decoded state within a snapshot.
///
/// `parent` declares the hierarchy; array position within the payload
/// only fixes sibling order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerState {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Parent layer id; `-1` attaches the layer directly to the root.
    #[serde(default = "no_parent")]
    pub parent: i64,
    /// Sibling-relative stacking indices from the root down, variable
    /// length.
    #[serde(default)]
    pub z_order_path: Vec<i32>,
    #[serde(default)]
    pub layer_stack: u32,
    #[serde(default)]
    pub bounds: Option<Rect>,
    /// Post-transform box in display space, when the source computed it.
    #[serde(default)]
    pub screen_bounds: Option<Rect>,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default)]
    pub is_computed_visible: bool,
    /// Ids of layers drawn above that cover this one. Recorded, never
    /// used to drop geometry.
    #[serde(default)]
    pub occluded_by: Vec<u64>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub transform: Transform,
}

fn no_parent() -> i64 {
    -1
}

/// A full compositor state snapshot: every display and every layer at
/// one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayersSnapshot {
    #[serde(default)]
    pub displays: Vec<DisplayState>,
    #[serde(default)]
    pub layers: Vec<LayerState>,
}
