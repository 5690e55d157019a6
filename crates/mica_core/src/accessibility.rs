//! Accessibility tree derivation.
//!
//! `derive` walks a `ViewNode` tree depth-first in paint order and produces
//! a flat, ordered snapshot. It is derived on demand, not incrementally
//! maintained — the tree is cheap enough to rebuild per accessibility
//! refresh and this avoids a second source of truth next to the layer tree.

use crate::view_node::{AccessibilityRole, ViewNodeHandle, ViewNodeId};
use crate::geometry::Frame;

/// One accessibility-visible node, in depth-first paint order.
#[derive(Clone, Debug)]
pub struct AccessibilityNode {
    pub view_node_id: ViewNodeId,
    pub label: Option<String>,
    pub role: AccessibilityRole,
    /// Screen-space frame, post-transform, pre-clip — the same frame
    /// visibility computation needs (spec.md §4.10 step 5).
    pub frame: Frame,
    pub depth: usize,
}

/// Derive the flattened accessibility tree rooted at `root`.
///
/// Nodes marked `hidden` are skipped along with their entire subtree —
/// matching how a platform accessibility tree treats a hidden container.
pub fn derive(root: &ViewNodeHandle) -> Vec<AccessibilityNode> {
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out
}

fn walk(node: &ViewNodeHandle, depth: usize, out: &mut Vec<AccessibilityNode>) {
    let state = node.borrow().accessibility.clone();
    if state.hidden {
        return;
    }

    let layer = node.layer();
    out.push(AccessibilityNode {
        view_node_id: node.id(),
        label: state.label,
        role: state.role.unwrap_or(AccessibilityRole::None),
        frame: layer.frame_in_root(),
        depth,
    });

    for child in node.layer().children_in_paint_order() {
        // children_in_paint_order operates on Layers; find the matching
        // ViewNode child by identity to keep walking the logical tree.
        match node.children().into_iter().find(|c| c.layer().ptr_eq(&child)) {
            Some(child_node) => walk(&child_node, depth + 1, out),
            None => tracing::warn!("layer child with no matching ViewNode, skipping its subtree"),
        }
    }
}
