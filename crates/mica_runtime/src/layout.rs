//! The flexbox layout solver boundary (spec.md §4.10 step 3). Mica never
//! ships a flexbox implementation itself — computing `Layer` frames from a
//! view tree's layout attributes is delegated to an external collaborator,
//! the same "trait at the seam, concrete impl lives elsewhere" shape as
//! `mica_core::Canvas` and `mica_platform::ViewTransaction`.

use mica_core::{Size, ViewNodeHandle, ViewNodeId};

/// Computes frames for a dirty subtree and reports which nodes actually
/// changed, so the scheduler knows which `setViewFrame` calls to queue.
///
/// `root` is the tree root, `dirty` the node ids the scheduler observed
/// needing layout this tick, and `available` the viewport size to lay out
/// against. Implementations are free to do more work than `dirty` strictly
/// requires (e.g. a subtree re-flow), but must only report ids whose
/// `Layer::frame` actually changed.
pub trait LayoutSolver {
    fn solve(&mut self, root: &ViewNodeHandle, dirty: &[ViewNodeId], available: Size) -> Vec<ViewNodeId>;
}

/// A `LayoutSolver` that does nothing. Useful for driving the scheduler in
/// isolation (tests, headless embedding without a real layout engine) where
/// frames are set directly rather than computed from layout attributes.
#[derive(Default)]
pub struct NoopLayoutSolver;

impl LayoutSolver for NoopLayoutSolver {
    fn solve(&mut self, _root: &ViewNodeHandle, _dirty: &[ViewNodeId], _available: Size) -> Vec<ViewNodeId> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::{Layer, LayerHandle, ViewTree};

    #[test]
    fn noop_solver_reports_no_changes() {
        let mut tree = ViewTree::new();
        let root = tree.create_node(LayerHandle::new(Layer::default()));
        let mut solver = NoopLayoutSolver;
        let changed = solver.solve(&root, &[root.id()], Size::new(400.0, 800.0));
        assert!(changed.is_empty());
    }
}
