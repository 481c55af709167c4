//! Derives screen-space rects for every node in a hierarchy tree:
//! synthetic display rects on the root, one rect per layer node with
//! usable geometry, with dense per-group draw order.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::warn;
use uiscope_geometry::{Rect, TraceRect};

use crate::computations::Computation;
use crate::model::DisplayState;
use crate::tree::{HierarchyTreeNode, NodeProperties};

/// Minimum overlap (in source units, per dimension) between a layer's
/// box and the union of display regions for the box to count as
/// on-screen. Tuned against recorded fixtures, not derived.
pub const INVALID_OVERLAP_EPSILON: f64 = 1e-2;

/// Stacking comparison for two layers: `z_order_path` element-wise,
/// then shorter path first, then ascending numeric id. Total over
/// (path, id) pairs, so depth ranks are stable.
pub fn compare_z_order(path_a: &[i32], id_a: u64, path_b: &[i32], id_b: u64) -> Ordering {
    for (a, b) in path_a.iter().zip(path_b.iter()) {
        match a.cmp(b) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    path_a
        .len()
        .cmp(&path_b.len())
        .then_with(|| id_a.cmp(&id_b))
}

/// The geometry computation. Stateless; safe to re-run on the same
/// tree, replacing all previously attached rects.
#[derive(Debug, Default)]
pub struct RectsComputation;

impl RectsComputation {
    pub fn new() -> Self {
        Self
    }
}

/// Candidate layer rect before depth assignment, keyed by DFS position.
struct Candidate {
    dfs_index: usize,
    numeric_id: u64,
    z_order_path: Vec<i32>,
    group_id: u32,
    rect: TraceRect,
}

/// Display position and extent with the display transform applied; a
/// quarter rotation swaps width and height.
fn display_geometry(display: &DisplayState) -> Rect {
    let (x, y, w, h) = match &display.layer_stack_space_rect {
        Some(r) if !r.is_empty() => (r.left, r.top, r.width(), r.height()),
        _ => (0.0, 0.0, display.size.w, display.size.h),
    };
    if display.transform.kind.swaps_width_height() {
        Rect::new(x, y, x + h, y + w)
    } else {
        Rect::new(x, y, x + w, y + h)
    }
}

fn make_display_rects(displays: &[DisplayState]) -> Vec<TraceRect> {
    let mut name_counts: HashMap<String, u32> = HashMap::new();
    displays
        .iter()
        .enumerate()
        .map(|(position, display)| {
            let geometry = display_geometry(display);

            // Blank and duplicate names stay distinguishable: the 2nd,
            // 3rd, ... display resolving to the same base name gets a
            // " (N)" suffix, in list order.
            let base = display
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or("Unknown Display");
            let count = name_counts.entry(base.to_string()).or_insert(0);
            *count += 1;
            let name = if *count == 1 {
                base.to_string()
            } else {
                format!("{base} ({count})")
            };

            TraceRect {
                x: geometry.left,
                y: geometry.top,
                width: geometry.width(),
                height: geometry.height(),
                transform: display.transform.matrix,
                id: format!("Display - {}", display.id),
                name,
                corner_radius: 0.0,
                depth: position as u32,
                group_id: display.layer_stack,
                is_visible: false,
                opacity: None,
                is_display: true,
            }
        })
        .collect()
}

/// Best available box for a layer: the precomputed `screen_bounds`,
/// else `bounds` mapped through the node transform, else nothing.
fn layer_box(props: &NodeProperties) -> Option<Rect> {
    if let Some(screen_bounds) = &props.screen_bounds {
        return Some(*screen_bounds);
    }
    if let Some(bounds) = &props.bounds {
        warn!(
            "layer {} has no screen bounds; deriving from bounds and transform",
            props.id
        );
        return Some(props.transform.apply_rect(bounds));
    }
    None
}

/// A box is on-screen when it has positive extent and, if any displays
/// are declared, overlaps the union of their regions by more than the
/// epsilon in both dimensions.
fn is_on_screen(rect: &Rect, display_regions: &[Rect]) -> bool {
    if rect.is_empty() {
        return false;
    }
    if display_regions.is_empty() {
        return true;
    }
    display_regions.iter().any(|region| {
        rect.intersect(region).is_some_and(|overlap| {
            overlap.width() > INVALID_OVERLAP_EPSILON && overlap.height() > INVALID_OVERLAP_EPSILON
        })
    })
}

fn layer_candidate(
    props: &NodeProperties,
    dfs_index: usize,
    display_regions: &[Rect],
) -> Option<Candidate> {
    let rect = layer_box(props)?;
    // Invalid bounds suppress the rect entirely, visible or not. A
    // non-visible layer with valid bounds still yields a rect so it
    // stays selectable; only its opacity is zeroed.
    if !is_on_screen(&rect, display_regions) {
        return None;
    }

    let opacity = if props.is_computed_visible {
        Some(props.color.map_or(1.0, |c| f64::from(c.a)))
    } else {
        Some(0.0)
    };

    Some(Candidate {
        dfs_index,
        numeric_id: props.id,
        z_order_path: props.z_order_path.clone(),
        group_id: props.layer_stack,
        rect: TraceRect {
            x: rect.left,
            y: rect.top,
            width: rect.width(),
            height: rect.height(),
            transform: props.transform.matrix,
            id: format!("{} {}", props.id, props.name),
            name: props.name.clone(),
            corner_radius: props.corner_radius,
            depth: 0, // assigned below, dense per group
            group_id: props.layer_stack,
            is_visible: props.is_computed_visible,
            opacity,
            is_display: false,
        },
    })
}

/// Dense 0-based ranks per `group_id`, consistent with the z-order
/// comparator. Display rect depths (list positions) never mix with
/// these.
fn assign_depths(candidates: &mut [Candidate]) {
    let mut by_group: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, candidate) in candidates.iter().enumerate() {
        by_group.entry(candidate.group_id).or_default().push(i);
    }
    for indices in by_group.values_mut() {
        indices.sort_by(|&a, &b| {
            compare_z_order(
                &candidates[a].z_order_path,
                candidates[a].numeric_id,
                &candidates[b].z_order_path,
                candidates[b].numeric_id,
            )
        });
        for (rank, &i) in indices.iter().enumerate() {
            candidates[i].rect.depth = rank as u32;
        }
    }
}

impl Computation for RectsComputation {
    fn name(&self) -> &'static str {
        "rects"
    }

    fn execute_in_place(&self, root: &mut HierarchyTreeNode) {
        let display_regions: Vec<Rect> = root
            .properties
            .displays
            .iter()
            .map(display_geometry)
            .collect();
        root.set_rects(make_display_rects(&root.properties.displays));

        // Pass 1: collect candidates over all descendants, DFS order.
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut dfs_index = 0usize;
        for child in root.children() {
            child.for_each_dfs(&mut |node| {
                if let Some(candidate) =
                    layer_candidate(&node.properties, dfs_index, &display_regions)
                {
                    candidates.push(candidate);
                }
                dfs_index += 1;
            });
        }

        assign_depths(&mut candidates);

        // Pass 2: write each rect back onto its node, clearing nodes
        // that contribute nothing this run.
        let mut by_index: HashMap<usize, TraceRect> = candidates
            .into_iter()
            .map(|c| (c.dfs_index, c.rect))
            .collect();
        let mut write_index = 0usize;
        root.for_each_descendant_mut(&mut |node| {
            match by_index.remove(&write_index) {
                Some(rect) => node.set_rects(vec![rect]),
                None => node.set_rects(Vec::new()),
            }
            write_index += 1;
        });
    }
}
