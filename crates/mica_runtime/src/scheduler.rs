//! The frame scheduler (spec.md §4.10): the single per-tick entry point that
//! drains gesture input, advances animations, runs layout, reconciles the
//! view tree, computes visibility, and flushes the transaction. Everything
//! here runs on the main thread (spec.md §5) — there are no suspension
//! points within a tick.

use rustc_hash::{FxHashMap, FxHashSet};

use mica_attributes::{AttributeHandler, AttributeId, AttributeOwner, AttributeValue};
use mica_core::{Direction, Duration, Frame, PlatformViewId, Point, Size, Vector, ViewNodeHandle, ViewNodeId};
use mica_platform::{AttributeHandlerDelegate, DragEvent, GestureState, ViewTransaction, WheelEvent};
use mica_scroll::{DragPhase, ScrollLayerHandle};

use crate::attributes::AttributeTable;
use crate::layout::LayoutSolver;

/// How far one discrete wheel tick moves the content offset. The original
/// derives this from the host's scroll-wheel configuration; gesture
/// recognition and per-wheel-event distance are both treated as already
/// resolved upstream of this boundary, so a single constant stands in here.
const WHEEL_STEP: f64 = 40.0;

enum PendingGesture {
    Drag { node: ViewNodeId, state: GestureState, event: DragEvent },
    Wheel { node: ViewNodeId, state: GestureState, event: WheelEvent },
}

/// Drives one view tree's frame-by-frame processing. Owns no rendering or
/// platform state itself — every externally observable effect goes through
/// the `ViewTransaction` passed to `tick`.
pub struct FrameScheduler {
    root: ViewNodeHandle,
    direction: Direction,
    viewport: Size,

    layout_solver: Box<dyn LayoutSolver>,
    layout_dirty: FxHashSet<ViewNodeId>,

    attributes: AttributeTable,

    scrollers: FxHashMap<ViewNodeId, ScrollLayerHandle>,
    pending_gestures: Vec<PendingGesture>,

    /// Nodes the scheduler knows have a live `Layer` animation, maintained
    /// incrementally so `needs_process_frame` doesn't have to walk every
    /// node every tick just to answer "is anything animating".
    animating: FxHashSet<ViewNodeId>,

    visible: FxHashSet<ViewNodeId>,
    on_visible: Vec<(ViewNodeId, Box<dyn FnOnce(ViewNodeId)>)>,
}

impl FrameScheduler {
    pub fn new(root: ViewNodeHandle, layout_solver: Box<dyn LayoutSolver>, viewport: Size) -> Self {
        Self {
            root,
            direction: Direction::Ltr,
            viewport,
            layout_solver,
            layout_dirty: FxHashSet::default(),
            attributes: AttributeTable::new(),
            scrollers: FxHashMap::default(),
            pending_gestures: Vec::new(),
            animating: FxHashSet::default(),
            visible: FxHashSet::default(),
            on_visible: Vec::new(),
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn is_visible(&self, node: ViewNodeId) -> bool {
        self.visible.contains(&node)
    }

    /// Register `node`'s scroll state so drag/wheel input addressed to it
    /// reaches the right `ScrollLayerHandle`. Hit-testing a raw pointer
    /// location down to a node id is a host concern upstream of this
    /// boundary (spec.md §6's gesture input carries no target); callers
    /// resolve the node id before calling `queue_drag`/`queue_wheel`.
    pub fn register_scroll(&mut self, node: ViewNodeId, scroll: ScrollLayerHandle) {
        self.scrollers.insert(node, scroll);
    }

    pub fn unregister_scroll(&mut self, node: ViewNodeId) {
        if let Some(scroll) = self.scrollers.remove(&node) {
            scroll.on_root_detached();
        }
    }

    pub fn mark_layout_dirty(&mut self, node: ViewNodeId) {
        self.layout_dirty.insert(node);
    }

    pub fn mark_animating(&mut self, node: ViewNodeId) {
        self.animating.insert(node);
    }

    /// Register what `handler` means across every node: its cached flags
    /// and the delegate that dispatches a resolved value to a platform
    /// view (spec.md §6's `bindXxxAttribute` family, collapsed to the
    /// untyped escape hatch since the dirty sweep works in resolved
    /// `AttributeValue` space).
    pub fn register_attribute_handler(&mut self, handler: &AttributeHandler, delegate: Box<dyn AttributeHandlerDelegate<AttributeValue>>) {
        self.attributes.register_handler(handler, delegate);
    }

    pub fn set_attribute(&mut self, node: ViewNodeId, attribute: AttributeId, owner: AttributeOwner, priority: u32, raw: AttributeValue) {
        self.attributes.set_attribute(node, attribute, owner, priority, raw);
    }

    pub fn reset_attribute(&mut self, node: ViewNodeId, attribute: AttributeId, owner: AttributeOwner) {
        self.attributes.reset_attribute(node, attribute, owner);
    }

    /// A running UI animation wants `value` applied to `attribute` this
    /// tick, in place of its resolved bound value.
    pub fn set_animated_attribute_value(&mut self, node: ViewNodeId, attribute: AttributeId, value: AttributeValue) {
        self.attributes.set_animated_value(node, attribute, value);
    }

    /// Assign `view` as `node`'s platform view and reapply every resolved
    /// attribute it has ever bound, not animated (spec.md §4.9.4).
    pub fn attach_platform_view(&mut self, node_id: ViewNodeId, view: PlatformViewId) {
        if let Some(node) = self.find_node(node_id) {
            node.borrow_mut().platform_view = Some(view);
        }
        self.attributes.on_view_materialized(node_id);
    }

    /// Clear `node`'s platform view. Attributes that `require-view` go
    /// dirty so they re-apply on the next `attach_platform_view`.
    pub fn detach_platform_view(&mut self, node_id: ViewNodeId) {
        if let Some(node) = self.find_node(node_id) {
            node.borrow_mut().platform_view = None;
        }
        self.attributes.on_view_discarded(node_id);
    }

    /// Queue a resolved drag gesture against `node`. Dispatched during the
    /// next `tick`'s step 1, in enqueue order (spec.md §5's ordering
    /// guarantee for platform events).
    pub fn queue_drag(&mut self, node: ViewNodeId, state: GestureState, event: DragEvent) {
        self.pending_gestures.push(PendingGesture::Drag { node, state, event });
    }

    pub fn queue_wheel(&mut self, node: ViewNodeId, state: GestureState, event: WheelEvent) {
        self.pending_gestures.push(PendingGesture::Wheel { node, state, event });
    }

    pub fn on_visible_once(&mut self, node: ViewNodeId, callback: impl FnOnce(ViewNodeId) + 'static) {
        self.on_visible.push((node, Box::new(callback)));
    }

    /// Whether the next `tick` would have any observable effect. Mirrors
    /// spec.md §4.10's `needsProcessFrame()`.
    pub fn needs_process_frame(&self) -> bool {
        !self.pending_gestures.is_empty() || !self.animating.is_empty() || !self.layout_dirty.is_empty() || self.attributes.has_dirty()
    }

    /// Run one full frame-scheduler tick.
    pub fn tick(&mut self, delta: Duration, transaction: &mut dyn ViewTransaction) {
        self.drain_gestures();
        self.tick_animations(delta);
        self.apply_attributes();
        self.run_layout(transaction);
        self.reconcile();
        self.update_visibility();
        let _ = transaction.flush(false);
    }

    /// Step 1: drain pending drag/wheel input through the registered
    /// scroller for the addressed node.
    fn drain_gestures(&mut self) {
        for gesture in std::mem::take(&mut self.pending_gestures) {
            match gesture {
                PendingGesture::Drag { node, state, event } => {
                    let Some(scroll) = self.scrollers.get(&node) else { continue };
                    match state {
                        GestureState::Began => scroll.on_scroll_drag(DragPhase::Began, event.offset, event.velocity, event.time),
                        GestureState::Changed => scroll.on_scroll_drag(DragPhase::Changed, event.offset, event.velocity, event.time),
                        GestureState::Ended => scroll.on_scroll_drag(DragPhase::Ended, event.offset, event.velocity, event.time),
                        GestureState::Cancelled => scroll.cancel_scroll_animation(),
                    }
                    self.animating.insert(node);
                }
                PendingGesture::Wheel { node, state, event } => {
                    if state != GestureState::Changed {
                        continue;
                    }
                    let Some(scroll) = self.scrollers.get(&node) else { continue };
                    let current = scroll.content_offset();
                    let target = Point::new(current.x + event.direction.dx * WHEEL_STEP, current.y + event.direction.dy * WHEEL_STEP);
                    scroll.set_content_offset(target, Vector::ZERO, true);
                    self.animating.insert(node);
                }
            }
        }
    }

    /// Step 2: advance every known-animating node's layer animations by
    /// `delta`. `Layer::tick_animation` calls `run`, and once it reports
    /// `Done` removes the animation from the map and calls `complete` on
    /// it, which applies the final state and fires completions.
    fn tick_animations(&mut self, delta: Duration) {
        let mut still_animating = FxHashSet::default();
        for node_id in self.animating.drain() {
            let Some(node) = self.find_node(node_id) else { continue };
            let layer = node.layer();
            let keys = layer.animation_keys();
            for key in &keys {
                layer.tick_animation(key, delta);
            }
            if !layer.animation_keys().is_empty() {
                still_animating.insert(node_id);
            }
        }
        self.animating = still_animating;
    }

    /// Attribute application, between animation ticking and layout
    /// (spec.md §4.9.4, §5: "attribute application" runs on the main
    /// thread alongside layout and view mutation). `translationX/Y`
    /// mutate the layer transform directly and never reach here as a
    /// layout concern; any other dirty attribute whose handler
    /// `invalidates-layout-on-change` marks its node layout-dirty so step
    /// 3 picks it up this same tick.
    fn apply_attributes(&mut self) {
        let root = self.root.clone();
        let mut invalidated = Vec::new();
        self.attributes.apply_dirty(
            |node_id| find_node_in(&root, node_id).map(|node| (node.layer(), node.borrow().platform_view)),
            |node_id| invalidated.push(node_id),
        );
        self.layout_dirty.extend(invalidated);
    }

    /// Step 3: if any node's layout is dirty, run the external layout
    /// solver and queue a `setViewFrame` for every frame it changed.
    fn run_layout(&mut self, transaction: &mut dyn ViewTransaction) {
        if self.layout_dirty.is_empty() {
            return;
        }
        let dirty: Vec<ViewNodeId> = self.layout_dirty.drain().collect();
        let changed = self.layout_solver.solve(&self.root, &dirty, self.viewport);
        let is_rtl = self.direction == Direction::Rtl;
        for node_id in changed {
            let Some(node) = self.find_node(node_id) else { continue };
            let Some(view) = node.borrow().platform_view else { continue };
            let frame = node.layer().borrow().frame;
            transaction.set_view_frame(view, frame, is_rtl, None);
        }
    }

    /// Step 4: reconcile view-tree insertions/removals. The logical and
    /// layer trees are kept isomorphic by `ViewNodeHandle::insert_child`/
    /// `remove_child` themselves (spec.md §3): a node detached from the
    /// tree is simply unreachable from `root` from that point on, so this
    /// step only has to drop bookkeeping the scheduler keeps on the side —
    /// scroll state, attribute state, and pending visibility callbacks for
    /// ids that fell out of the tree.
    fn reconcile(&mut self) {
        let stale: Vec<ViewNodeId> = self.scrollers.keys().copied().filter(|id| self.find_node(*id).is_none()).collect();
        for id in stale {
            tracing::debug!(?id, "dropping scroll state for a node that left the tree");
            self.scrollers.remove(&id);
        }
        let stale_attributes: Vec<ViewNodeId> = self.attributes.tracked_nodes().into_iter().filter(|id| self.find_node(*id).is_none()).collect();
        for id in stale_attributes {
            self.attributes.forget_node(id);
        }
        self.on_visible.retain(|(id, _)| self.find_node(*id).is_some());
    }

    /// Step 5: a node is visible iff its parent is and its frame (in root
    /// coordinates) intersects the clipped viewport. Transitioning from
    /// not-visible to visible fires any registered one-shot callback.
    fn update_visibility(&mut self) {
        let viewport = Frame::from_origin_size(Point::ZERO, self.viewport);
        let mut newly_visible = FxHashSet::default();
        let root = self.root.clone();
        self.walk_visibility(&root, true, viewport, &mut newly_visible);

        let fired: Vec<ViewNodeId> = newly_visible.difference(&self.visible).copied().collect();
        self.visible = newly_visible;

        if fired.is_empty() {
            return;
        }
        tracing::trace!(count = fired.len(), "nodes transitioned to visible");
        let mut remaining = Vec::new();
        for (node, callback) in std::mem::take(&mut self.on_visible) {
            if fired.contains(&node) {
                callback(node);
            } else {
                remaining.push((node, callback));
            }
        }
        self.on_visible = remaining;
    }

    fn walk_visibility(&self, node: &ViewNodeHandle, parent_visible: bool, viewport: Frame, out: &mut FxHashSet<ViewNodeId>) {
        let frame = node.layer().frame_in_root();
        let visible = parent_visible && frame.intersects(viewport);
        if visible {
            out.insert(node.id());
        }
        for child in node.children() {
            self.walk_visibility(&child, visible, viewport, out);
        }
    }

    /// Depth-first lookup by id against the scheduler's root. The logical
    /// tree is addressed by traversal rather than a second id-to-handle
    /// map, since `ViewTree` itself is owned by whichever code assembled
    /// the tree, not by the scheduler.
    fn find_node(&self, id: ViewNodeId) -> Option<ViewNodeHandle> {
        find_node_in(&self.root, id)
    }
}

/// Depth-first lookup by id, free of `&self` so it can be called while
/// `self.attributes` is mutably borrowed (spec.md §4.9.4's dirty sweep).
fn find_node_in(root: &ViewNodeHandle, id: ViewNodeId) -> Option<ViewNodeHandle> {
    if root.id() == id {
        return Some(root.clone());
    }
    root.children().iter().find_map(|child| find_node_in(child, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NoopLayoutSolver;
    use mica_core::{Layer, LayerHandle, ViewTree};
    use mica_platform::RecordingTransaction;
    use mica_scroll::AndroidScroller;

    fn make_scheduler() -> (FrameScheduler, ViewNodeHandle) {
        let mut tree = ViewTree::new();
        let root = tree.create_node(LayerHandle::new(Layer::default()));
        let scheduler = FrameScheduler::new(root.clone(), Box::new(NoopLayoutSolver), Size::new(400.0, 800.0));
        (scheduler, root)
    }

    #[test]
    fn needs_process_frame_is_false_when_idle() {
        let (scheduler, _root) = make_scheduler();
        assert!(!scheduler.needs_process_frame());
    }

    #[test]
    fn queued_drag_marks_the_node_animating_and_flushes_on_tick() {
        let (mut scheduler, root) = make_scheduler();
        let content = LayerHandle::new(Layer::default());
        let scroll = ScrollLayerHandle::new(root.layer(), content);
        scroll.set_content_size(Size::new(400.0, 2000.0));
        scroll.set_scroller(Box::new(AndroidScroller::new(scroll.clone())));
        scheduler.register_scroll(root.id(), scroll);

        assert!(!scheduler.needs_process_frame());
        scheduler.queue_drag(
            root.id(),
            GestureState::Began,
            DragEvent { time: Duration::ZERO, location: Point::ZERO, offset: Vector::ZERO, velocity: Vector::ZERO },
        );
        assert!(scheduler.needs_process_frame());

        let mut transaction = RecordingTransaction::new();
        scheduler.tick(Duration::from_millis(16), &mut transaction);
        assert!(transaction.calls.iter().any(|c| c.starts_with("flush")));
    }

    #[test]
    fn node_far_outside_the_viewport_is_not_visible() {
        let (mut scheduler, root) = make_scheduler();
        root.layer().borrow_mut().frame = Frame::new(10_000.0, 10_000.0, 10.0, 10.0);

        let mut transaction = RecordingTransaction::new();
        scheduler.tick(Duration::from_millis(16), &mut transaction);
        assert!(!scheduler.is_visible(root.id()));
    }

    #[test]
    fn node_inside_the_viewport_becomes_visible_and_fires_its_callback() {
        let (mut scheduler, root) = make_scheduler();
        root.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 50.0, 50.0);

        let fired = std::rc::Rc::new(std::cell::Cell::new(false));
        let fired_clone = fired.clone();
        scheduler.on_visible_once(root.id(), move |_| fired_clone.set(true));

        let mut transaction = RecordingTransaction::new();
        scheduler.tick(Duration::from_millis(16), &mut transaction);
        assert!(scheduler.is_visible(root.id()));
        assert!(fired.get());
    }

    #[test]
    fn a_layer_animation_is_ticked_to_completion_and_then_drops_out_of_animating() {
        let (mut scheduler, root) = make_scheduler();
        let applied = std::sync::Arc::new(std::sync::Mutex::new(0.0_f64));
        let applied_clone = applied.clone();
        let animation = mica_animation::TimeAnimation::new(
            Duration::from_millis(100),
            std::sync::Arc::new(mica_animation::Linear),
            Box::new(move |_layer, ratio| *applied_clone.lock().unwrap() = ratio),
        );
        root.layer().set_animation("test", Box::new(animation));
        scheduler.mark_animating(root.id());

        let mut transaction = RecordingTransaction::new();
        scheduler.tick(Duration::from_millis(0), &mut transaction);
        assert!(scheduler.needs_process_frame());

        scheduler.tick(Duration::from_millis(200), &mut transaction);
        assert_eq!(*applied.lock().unwrap(), 1.0);
        assert!(!root.layer().has_animation("test"));
    }

    #[test]
    fn unregistering_scroll_cancels_its_animation() {
        let (mut scheduler, root) = make_scheduler();
        let content = LayerHandle::new(Layer::default());
        let scroll = ScrollLayerHandle::new(root.layer(), content);
        scheduler.register_scroll(root.id(), scroll);
        scheduler.unregister_scroll(root.id());
        assert!(!scheduler.needs_process_frame());
    }

    struct RecordingDelegate(std::sync::Arc<std::sync::atomic::AtomicUsize>);

    impl AttributeHandlerDelegate<AttributeValue> for RecordingDelegate {
        fn apply(&self, _view: mica_core::PlatformViewId, _value: AttributeValue) -> Result<(), mica_attributes::AttributeError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }

        fn reset(&self, _view: mica_core::PlatformViewId) -> Result<(), mica_attributes::AttributeError> {
            Ok(())
        }
    }

    #[test]
    fn attaching_a_platform_view_reapplies_every_bound_attribute() {
        let (mut scheduler, root) = make_scheduler();
        let ids = mica_attributes::AttributeIds::new();
        let opacity_handler = AttributeHandler::new(ids.id_for_name("opacity"), "opacity", "View");
        let applied = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        scheduler.register_attribute_handler(&opacity_handler, Box::new(RecordingDelegate(applied.clone())));
        scheduler.set_attribute(root.id(), opacity_handler.id(), AttributeOwner::INLINE, 0, AttributeValue::Double(0.5));

        let mut transaction = RecordingTransaction::new();
        scheduler.attach_platform_view(root.id(), mica_core::PlatformViewId(1));
        scheduler.tick(Duration::from_millis(16), &mut transaction);
        assert_eq!(applied.load(std::sync::atomic::Ordering::SeqCst), 1);

        scheduler.detach_platform_view(root.id());
        scheduler.attach_platform_view(root.id(), mica_core::PlatformViewId(2));
        scheduler.tick(Duration::from_millis(16), &mut transaction);
        assert_eq!(applied.load(std::sync::atomic::Ordering::SeqCst), 2, "re-materializing reapplies the resolved attribute");
    }

    #[test]
    fn translation_attribute_moves_the_layer_without_marking_layout_dirty() {
        let (mut scheduler, root) = make_scheduler();
        let ids = mica_attributes::AttributeIds::new();
        let translation_x = ids.id_for_name("translationX");
        scheduler.attach_platform_view(root.id(), mica_core::PlatformViewId(1));
        scheduler.set_attribute(root.id(), translation_x, AttributeOwner::INLINE, 0, AttributeValue::Double(24.0));

        let mut transaction = RecordingTransaction::new();
        scheduler.tick(Duration::from_millis(16), &mut transaction);

        assert_eq!(root.layer().borrow().transform.translate_x, 24.0);
        assert!(!transaction.calls.iter().any(|c| c.starts_with("setViewFrame")), "a translation change must not trigger a re-measure");
    }
}
