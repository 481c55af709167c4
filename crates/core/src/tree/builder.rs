//! Builds the hierarchy tree for one decoded structured entry. Nesting
//! follows the parent-child relations declared in the payload, not
//! array position; sibling order is preserved as declared and feeds the
//! depth assignment when z order is absent or tied.

use log::warn;

use crate::model::{LayerState, LayersSnapshot, WindowContainer, WmSnapshot};
use crate::tree::{HierarchyTreeNode, NodeProperties};

/// Root node id for compositor snapshots.
pub const LAYERS_ROOT_ID: &str = "LayersTraceEntry";
/// Root node id for window-manager snapshots.
pub const WM_ROOT_ID: &str = "WindowManagerState";

fn layer_node(layer: &LayerState) -> HierarchyTreeNode {
    let properties = NodeProperties {
        id: layer.id,
        name: layer.name.clone(),
        bounds: layer.bounds,
        screen_bounds: layer.screen_bounds,
        corner_radius: layer.corner_radius,
        z_order_path: layer.z_order_path.clone(),
        layer_stack: layer.layer_stack,
        is_computed_visible: layer.is_computed_visible,
        occluded_by: layer.occluded_by.clone(),
        transform: layer.transform,
        color: layer.color,
        displays: Vec::new(),
    };
    HierarchyTreeNode::new(
        format!("{} {}", layer.id, layer.name),
        layer.name.clone(),
        properties,
    )
}

/// Attach `parent`'s declared children (in payload order), recursing.
fn attach_children(
    node: &mut HierarchyTreeNode,
    parent_id: i64,
    layers: &[LayerState],
) {
    for layer in layers.iter().filter(|l| l.parent == parent_id) {
        let mut child = layer_node(layer);
        attach_children(&mut child, layer.id as i64, layers);
        node.add_child(child);
    }
}

/// Build the tree for one compositor snapshot: displays at the root,
/// layers nested by their declared `parent` id.
pub fn from_layers_snapshot(snapshot: &LayersSnapshot) -> HierarchyTreeNode {
    let properties = NodeProperties {
        name: "root".to_string(),
        displays: snapshot.displays.clone(),
        ..NodeProperties::default()
    };
    let mut root = HierarchyTreeNode::new(LAYERS_ROOT_ID, "root", properties);
    attach_children(&mut root, -1, &snapshot.layers);

    // Layers whose declared parent does not exist in this snapshot are
    // kept rather than dropped: they attach to the root, in payload order.
    let known: Vec<i64> = snapshot.layers.iter().map(|l| l.id as i64).collect();
    for layer in &snapshot.layers {
        if layer.parent != -1 && !known.contains(&layer.parent) {
            warn!(
                "layer {} references missing parent {}; attaching to root",
                layer.id, layer.parent
            );
            let mut child = layer_node(layer);
            attach_children(&mut child, layer.id as i64, &snapshot.layers);
            root.add_child(child);
        }
    }
    root
}

fn container_node(container: &WindowContainer) -> HierarchyTreeNode {
    let properties = NodeProperties {
        id: container.id,
        name: container.name.clone(),
        bounds: container.bounds,
        is_computed_visible: container.is_visible,
        ..NodeProperties::default()
    };
    let mut node = HierarchyTreeNode::new(
        format!("{} {}", container.id, container.name),
        container.name.clone(),
        properties,
    );
    for child in &container.children {
        node.add_child(container_node(child));
    }
    node
}

/// Build the tree for one window-manager snapshot, mirroring the
/// payload's already-nested containers.
pub fn from_wm_snapshot(snapshot: &WmSnapshot) -> HierarchyTreeNode {
    let properties = NodeProperties {
        id: snapshot.root.id,
        name: snapshot.root.name.clone(),
        ..NodeProperties::default()
    };
    let mut root = HierarchyTreeNode::new(WM_ROOT_ID, snapshot.root.name.clone(), properties);
    for child in &snapshot.root.children {
        root.add_child(container_node(child));
    }
    root
}
