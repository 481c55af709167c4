pub mod builder;

pub use builder::{from_layers_snapshot, from_wm_snapshot};

use serde::{Deserialize, Serialize};
use uiscope_geometry::{Color, Rect, TraceRect, Transform};

use crate::model::DisplayState;

/// The decoded fields relevant to geometry, one typed bag per node.
/// Everything here comes from the wire; derived data lives on the node
/// itself and is rewritten by computations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeProperties {
    pub id: u64,
    pub name: String,
    pub bounds: Option<Rect>,
    pub screen_bounds: Option<Rect>,
    pub corner_radius: f64,
    pub z_order_path: Vec<i32>,
    pub layer_stack: u32,
    pub is_computed_visible: bool,
    pub occluded_by: Vec<u64>,
    pub transform: Transform,
    pub color: Option<Color>,
    /// Populated on the root node only.
    pub displays: Vec<DisplayState>,
}

/// A node in the rooted hierarchy tree built from one snapshot.
///
/// Children are exclusively owned; parent access is by traversal only
/// (no stored back-pointer). Sibling ids need not be unique — display
/// keys are disambiguated by the rects computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyTreeNode {
    id: String,
    name: String,
    pub properties: NodeProperties,
    children: Vec<HierarchyTreeNode>,
    /// Screen-space rects attached by the rects computation. Never
    /// present before a computation ran; overwritten on each run.
    rects: Vec<TraceRect>,
    /// Secondary geometry (e.g. input regions) attached by later
    /// computation passes.
    secondary_rects: Vec<TraceRect>,
    /// Why a non-visible node is not visible; attached by the
    /// visibility-reasons computation.
    visibility_reasons: Vec<String>,
}

impl HierarchyTreeNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, properties: NodeProperties) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties,
            children: Vec::new(),
            rects: Vec::new(),
            secondary_rects: Vec::new(),
            visibility_reasons: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_child(&mut self, child: HierarchyTreeNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[HierarchyTreeNode] {
        &self.children
    }

    pub fn rects(&self) -> &[TraceRect] {
        &self.rects
    }

    pub fn secondary_rects(&self) -> &[TraceRect] {
        &self.secondary_rects
    }

    pub fn visibility_reasons(&self) -> &[String] {
        &self.visibility_reasons
    }

    pub fn set_rects(&mut self, rects: Vec<TraceRect>) {
        self.rects = rects;
    }

    pub fn set_secondary_rects(&mut self, rects: Vec<TraceRect>) {
        self.secondary_rects = rects;
    }

    pub fn set_visibility_reasons(&mut self, reasons: Vec<String>) {
        self.visibility_reasons = reasons;
    }

    /// Visit this node and all descendants, depth first, children in
    /// declared order.
    pub fn for_each_dfs<'a>(&'a self, f: &mut impl FnMut(&'a HierarchyTreeNode)) {
        f(self);
        for child in &self.children {
            child.for_each_dfs(f);
        }
    }

    /// Visit every descendant (excluding `self`) mutably, in the same
    /// order as `for_each_dfs`.
    pub fn for_each_descendant_mut(&mut self, f: &mut impl FnMut(&mut HierarchyTreeNode)) {
        for child in &mut self.children {
            f(child);
            child.for_each_descendant_mut(f);
        }
    }

    /// First node (in DFS order) whose display id matches.
    pub fn find(&self, id: &str) -> Option<&HierarchyTreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Parent of the node with the given display id, resolved by
    /// traversal. `None` for the root or an unknown id.
    pub fn parent_of(&self, id: &str) -> Option<&HierarchyTreeNode> {
        if self.children.iter().any(|c| c.id == id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.parent_of(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> HierarchyTreeNode {
        HierarchyTreeNode::new(id, id, NodeProperties::default())
    }

    fn sample_tree() -> HierarchyTreeNode {
        let mut root = leaf("root");
        let mut a = leaf("a");
        a.add_child(leaf("a1"));
        a.add_child(leaf("a2"));
        root.add_child(a);
        root.add_child(leaf("b"));
        root
    }

    #[test]
    fn dfs_order_is_declared_order() {
        let root = sample_tree();
        let mut seen = Vec::new();
        root.for_each_dfs(&mut |n| seen.push(n.id().to_string()));
        assert_eq!(seen, ["root", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn parent_resolved_by_traversal() {
        let root = sample_tree();
        assert_eq!(root.parent_of("a2").map(HierarchyTreeNode::id), Some("a"));
        assert_eq!(root.parent_of("b").map(HierarchyTreeNode::id), Some("root"));
        assert!(root.parent_of("root").is_none());
        assert!(root.parent_of("nope").is_none());
    }

    #[test]
    fn duplicate_sibling_ids_are_legal() {
        let mut root = leaf("root");
        root.add_child(leaf("dup"));
        root.add_child(leaf("dup"));
        assert_eq!(root.children().len(), 2);
        // find returns the first in declared order
        assert!(root.find("dup").is_some());
    }
}
