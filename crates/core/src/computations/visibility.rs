//! Attaches the reasons a node is not visible, derived from decoded
//! properties. Runs after the rects computation in the standard
//! pipeline order; never alters geometry.

use crate::computations::Computation;
use crate::tree::{HierarchyTreeNode, NodeProperties};

#[derive(Debug, Default)]
pub struct VisibilityReasonsComputation;

impl VisibilityReasonsComputation {
    pub fn new() -> Self {
        Self
    }
}

fn reasons(props: &NodeProperties) -> Vec<String> {
    if props.is_computed_visible {
        return Vec::new();
    }

    let mut reasons = Vec::new();
    if !props.occluded_by.is_empty() {
        let ids: Vec<String> = props.occluded_by.iter().map(u64::to_string).collect();
        reasons.push(format!("occluded by {}", ids.join(", ")));
    }
    if props.color.is_some_and(|c| c.a == 0.0) {
        reasons.push("alpha is 0".to_string());
    }
    let no_box = |b: &Option<uiscope_geometry::Rect>| b.map_or(true, |r| r.is_empty());
    if no_box(&props.bounds) && no_box(&props.screen_bounds) {
        reasons.push("bounds is 0x0".to_string());
    }
    if reasons.is_empty() {
        reasons.push("unknown".to_string());
    }
    reasons
}

impl Computation for VisibilityReasonsComputation {
    fn name(&self) -> &'static str {
        "visibility reasons"
    }

    fn execute_in_place(&self, root: &mut HierarchyTreeNode) {
        root.set_visibility_reasons(Vec::new());
        root.for_each_descendant_mut(&mut |node| {
            node.set_visibility_reasons(reasons(&node.properties));
        });
    }
}
