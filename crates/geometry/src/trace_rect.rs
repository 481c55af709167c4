use serde::{Deserialize, Serialize};

use crate::transform::Matrix;

/// A computed screen-space rectangle for one hierarchy node, as handed
/// to the presentation layer. Produced by the rects computation; never
/// decoded from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRect {
    /// Post-transform position in display space.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// The matrix that was applied to reach display space.
    pub transform: Matrix,
    /// Disambiguated display key (`"<id> <name>"` for layers,
    /// `"Display - <id>"` for displays).
    pub id: String,
    pub name: String,
    pub corner_radius: f64,
    /// Draw-order index within `group_id`; lower is drawn first.
    /// Display rects and layer rects use separate numbering spaces.
    pub depth: u32,
    /// The layer stack / display group this rect belongs to.
    pub group_id: u32,
    pub is_visible: bool,
    /// Alpha in `[0, 1]`. `None` for display rects, which carry no
    /// opacity of their own.
    pub opacity: Option<f64>,
    /// Synthetic display-boundary rect, exempt from visibility and
    /// occlusion logic.
    pub is_display: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::IDENTITY_MATRIX;

    #[test]
    fn serializes_round_trip() {
        let rect = TraceRect {
            x: 0.0,
            y: 0.0,
            width: 1080.0,
            height: 2400.0,
            transform: IDENTITY_MATRIX,
            id: "1 Wallpaper".to_string(),
            name: "Wallpaper".to_string(),
            corner_radius: 0.0,
            depth: 0,
            group_id: 0,
            is_visible: true,
            opacity: Some(1.0),
            is_display: false,
        };
        let json = serde_json::to_string(&rect).unwrap();
        let back: TraceRect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}

