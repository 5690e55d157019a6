//! Wires `mica_attributes`' per-node value resolution and dirty tracking
//! into the scheduler's tick loop (spec.md §4.9.4): materialize reapplies
//! every resolved attribute, discard marks `requires-view` attributes
//! dirty, a changed attribute whose handler `invalidates-layout-on-change`
//! triggers a re-measure, and `translationX`/`translationY` mutate the
//! layer transform directly rather than going through a platform view at
//! all.

use rustc_hash::FxHashMap;

use mica_attributes::{
    AttributeFlags, AttributeHandler, AttributeId, AttributeOwner, AttributeValue, CompositeAttribute, ViewNodeAttributes,
};
use mica_core::{LayerHandle, PlatformViewId, ViewNodeId};
use mica_platform::AttributeHandlerDelegate;

/// `translationX`/`translationY`'s ids, resolved once against the
/// process-wide interner and cached rather than re-interned every sweep.
struct TranslationIds {
    x: AttributeId,
    y: AttributeId,
}

impl TranslationIds {
    fn resolve() -> Self {
        let ids = mica_attributes::global();
        Self { x: ids.id_for_name("translationX"), y: ids.id_for_name("translationY") }
    }
}

/// One attribute id's cached flags plus the delegate that dispatches a
/// resolved value to a platform view. Shared across every node: which
/// attributes a node actually sets is a view-class concern upstream of
/// this table (spec.md §6); the table itself only needs to know, for any
/// id it's told about, how to apply or reset it.
struct Registration {
    flags: AttributeFlags,
    delegate: Box<dyn AttributeHandlerDelegate<AttributeValue>>,
}

/// Owns every tracked node's `ViewNodeAttributes` plus the scheduler-wide
/// registry mapping an attribute id to its handler flags and host
/// dispatch delegate.
///
/// Deliberately distinct from `mica_attributes::BoundAttributes`: that
/// type is pure value resolution with no notion of "this scheduler knows
/// how to dispatch this attribute" — that boundary concern lives here,
/// where the attribute pipeline meets the view transaction.
#[derive(Default)]
pub struct AttributeTable {
    nodes: FxHashMap<ViewNodeId, ViewNodeAttributes>,
    registry: FxHashMap<AttributeId, Registration>,
    composites: FxHashMap<AttributeId, CompositeAttribute>,
    part_to_composite: FxHashMap<AttributeId, AttributeId>,
    translation: Option<TranslationIds>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn translation_ids(&mut self) -> (AttributeId, AttributeId) {
        let ids = self.translation.get_or_insert_with(TranslationIds::resolve);
        (ids.x, ids.y)
    }

    fn node_mut(&mut self, node: ViewNodeId) -> &mut ViewNodeAttributes {
        let part_to_composite = &self.part_to_composite;
        self.nodes.entry(node).or_insert_with(|| {
            let mut attrs = ViewNodeAttributes::new();
            for (&part, &composite) in part_to_composite {
                attrs.register_composite_part(part, composite);
            }
            attrs
        })
    }

    /// Register what `handler` means for every node this table will ever
    /// see: its cached flags, and the delegate that dispatches a resolved
    /// value to a platform view.
    pub fn register_handler(&mut self, handler: &AttributeHandler, delegate: Box<dyn AttributeHandlerDelegate<AttributeValue>>) {
        self.registry.insert(handler.id(), Registration { flags: AttributeFlags::from(handler), delegate });
    }

    /// Register a composite (`border`, `boxShadow`, ...): every already-
    /// tracked node (and every one created from here on) routes a changed
    /// part's dirtiness to the composite's own id (spec.md §4.9.1).
    pub fn register_composite(&mut self, composite: CompositeAttribute) {
        for part in composite.parts() {
            self.part_to_composite.insert(part.id, composite.id());
            for node in self.nodes.values_mut() {
                node.register_composite_part(part.id, composite.id());
            }
        }
        self.composites.insert(composite.id(), composite);
    }

    pub fn set_attribute(&mut self, node: ViewNodeId, attribute: AttributeId, owner: AttributeOwner, priority: u32, raw: AttributeValue) {
        if let Some(registration) = self.registry.get(&attribute) {
            let flags = registration.flags;
            self.node_mut(node).register_flags(attribute, flags);
        }
        self.node_mut(node).set(attribute, owner, priority, raw);
    }

    pub fn reset_attribute(&mut self, node: ViewNodeId, attribute: AttributeId, owner: AttributeOwner) {
        self.node_mut(node).reset(attribute, owner);
    }

    /// A running UI animation wants `value` applied this tick, in place of
    /// the attribute's resolved bound value.
    pub fn set_animated_value(&mut self, node: ViewNodeId, attribute: AttributeId, value: AttributeValue) {
        self.node_mut(node).set_pending_animated(attribute, value);
    }

    /// A platform view was just created/assigned for `node`.
    pub fn on_view_materialized(&mut self, node: ViewNodeId) {
        self.node_mut(node).mark_materialized();
    }

    /// `node`'s platform view was just torn down.
    pub fn on_view_discarded(&mut self, node: ViewNodeId) {
        self.node_mut(node).mark_discarded();
    }

    pub fn forget_node(&mut self, node: ViewNodeId) {
        self.nodes.remove(&node);
    }

    pub fn tracked_nodes(&self) -> Vec<ViewNodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn has_dirty(&self) -> bool {
        self.nodes.values().any(ViewNodeAttributes::has_any_dirty)
    }

    /// Apply every dirty attribute across every tracked node. `view_for`
    /// resolves a node id to its layer and (if materialized) platform
    /// view; `on_layout_dirty` is called for every node touched by an
    /// attribute whose handler `invalidates-layout-on-change`.
    ///
    /// Dispatch failures are logged and skipped rather than propagated —
    /// spec.md §7's closing invariant: no attribute error aborts a frame
    /// tick.
    pub fn apply_dirty(
        &mut self,
        view_for: impl Fn(ViewNodeId) -> Option<(LayerHandle, Option<PlatformViewId>)>,
        mut on_layout_dirty: impl FnMut(ViewNodeId),
    ) {
        let (translation_x, translation_y) = self.translation_ids();
        let node_ids: Vec<ViewNodeId> = self.nodes.keys().copied().collect();

        for node_id in node_ids {
            let dirty = self.nodes.get_mut(&node_id).map(ViewNodeAttributes::take_dirty).unwrap_or_default();
            if dirty.is_empty() {
                continue;
            }
            let Some((layer, platform_view)) = view_for(node_id) else { continue };

            for (attribute, fallback_value) in dirty {
                if attribute == translation_x || attribute == translation_y {
                    // Transform changes never invalidate measure and never
                    // touch the platform view — they mutate the layer
                    // directly (spec.md §4.9.4).
                    if let Some(value) = fallback_value.as_ref().and_then(AttributeValue::as_f64) {
                        let mut layer = layer.borrow_mut();
                        if attribute == translation_x {
                            layer.transform.translate_x = value;
                        } else {
                            layer.transform.translate_y = value;
                        }
                    }
                    continue;
                }

                // A dirty composite id never has a bound value of its own —
                // only its parts do — so assemble it from its parts'
                // currently-resolved values rather than treating the
                // `take_dirty` fallback of `None` as a reset.
                let value = match self.composites.get(&attribute) {
                    Some(composite) => {
                        let node = self.nodes.get(&node_id);
                        let mut parts = FxHashMap::default();
                        if let Some(node) = node {
                            for part in composite.parts() {
                                if let Some(part_value) = node.resolved(part.id) {
                                    parts.insert(part.name.as_str(), part_value.clone());
                                }
                            }
                        }
                        composite.assemble(&parts)
                    }
                    None => fallback_value,
                };

                let Some(registration) = self.registry.get(&attribute) else { continue };
                if registration.flags.invalidates_layout_on_change {
                    on_layout_dirty(node_id);
                }
                let Some(view) = platform_view else { continue };
                let outcome = match value {
                    Some(value) => registration.delegate.apply(view, value),
                    None => registration.delegate.reset(view),
                };
                if let Err(error) = outcome {
                    tracing::warn!(%error, ?node_id, ?attribute, "attribute dispatch failed, skipping");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_attributes::AttributeError;
    use mica_core::{Layer, LayerHandle};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct RecordingDelegate {
        applied: Arc<AtomicUsize>,
        reset: Arc<AtomicUsize>,
    }

    impl AttributeHandlerDelegate<AttributeValue> for RecordingDelegate {
        fn apply(&self, _view: PlatformViewId, _value: AttributeValue) -> Result<(), AttributeError> {
            self.applied.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn reset(&self, _view: PlatformViewId) -> Result<(), AttributeError> {
            self.reset.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn ids() -> mica_attributes::AttributeIds {
        mica_attributes::AttributeIds::new()
    }

    #[test]
    fn translation_attributes_mutate_the_layer_transform_without_a_platform_view() {
        let mut table = AttributeTable::new();
        let ids = ids();
        let translation_x = ids.id_for_name("translationX");
        table.set_attribute(ViewNodeId::default(), translation_x, AttributeOwner::INLINE, 0, AttributeValue::Double(12.0));

        let layer = LayerHandle::new(Layer::default());
        let mut layout_dirty_calls = 0;
        table.apply_dirty(
            |_| Some((layer.clone(), None)),
            |_| layout_dirty_calls += 1,
        );

        assert_eq!(layer.borrow().transform.translate_x, 12.0);
        assert_eq!(layout_dirty_calls, 0, "translation changes never invalidate layout");
    }

    #[test]
    fn an_invalidating_attribute_change_calls_on_layout_dirty_and_dispatches() {
        let mut table = AttributeTable::new();
        let ids = ids();
        let mut handler = AttributeHandler::new(ids.id_for_name("text"), "text", "Label");
        handler.set_invalidates_layout_on_change(true);
        let applied = Arc::new(AtomicUsize::new(0));
        let reset = Arc::new(AtomicUsize::new(0));
        table.register_handler(&handler, Box::new(RecordingDelegate { applied: applied.clone(), reset: reset.clone() }));

        let node = ViewNodeId::default();
        table.set_attribute(node, handler.id(), AttributeOwner::INLINE, 0, AttributeValue::String("hi".into()));

        let layer = LayerHandle::new(Layer::default());
        let mut layout_dirty_calls = 0;
        table.apply_dirty(
            |_| Some((layer.clone(), Some(PlatformViewId(1)))),
            |_| layout_dirty_calls += 1,
        );

        assert_eq!(layout_dirty_calls, 1);
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert_eq!(reset.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn materializing_redispatches_every_known_attribute() {
        let mut table = AttributeTable::new();
        let ids = ids();
        let handler = AttributeHandler::new(ids.id_for_name("opacity"), "opacity", "View");
        let applied = Arc::new(AtomicUsize::new(0));
        table.register_handler(&handler, Box::new(RecordingDelegate { applied: applied.clone(), reset: Arc::new(AtomicUsize::new(0)) }));

        let node = ViewNodeId::default();
        table.set_attribute(node, handler.id(), AttributeOwner::INLINE, 0, AttributeValue::Double(0.5));
        let layer = LayerHandle::new(Layer::default());
        table.apply_dirty(|_| Some((layer.clone(), Some(PlatformViewId(1)))), |_| {});
        assert_eq!(applied.load(Ordering::SeqCst), 1);

        table.on_view_materialized(node);
        table.apply_dirty(|_| Some((layer.clone(), Some(PlatformViewId(1)))), |_| {});
        assert_eq!(applied.load(Ordering::SeqCst), 2, "materialize reapplies every resolved attribute");
    }

    #[test]
    fn discard_only_redirties_attributes_that_require_a_view() {
        let mut table = AttributeTable::new();
        let ids = ids();
        let mut src_handler = AttributeHandler::new(ids.id_for_name("src"), "src", "Image");
        src_handler.set_requires_view(true);
        let opacity_handler = AttributeHandler::new(ids.id_for_name("opacity"), "opacity", "View");

        let src_applied = Arc::new(AtomicUsize::new(0));
        let opacity_applied = Arc::new(AtomicUsize::new(0));
        table.register_handler(&src_handler, Box::new(RecordingDelegate { applied: src_applied.clone(), reset: Arc::new(AtomicUsize::new(0)) }));
        table.register_handler(&opacity_handler, Box::new(RecordingDelegate { applied: opacity_applied.clone(), reset: Arc::new(AtomicUsize::new(0)) }));

        let node = ViewNodeId::default();
        table.set_attribute(node, src_handler.id(), AttributeOwner::INLINE, 0, AttributeValue::String("a.png".into()));
        table.set_attribute(node, opacity_handler.id(), AttributeOwner::INLINE, 0, AttributeValue::Double(1.0));
        let layer = LayerHandle::new(Layer::default());
        table.apply_dirty(|_| Some((layer.clone(), Some(PlatformViewId(1)))), |_| {});
        assert_eq!(src_applied.load(Ordering::SeqCst), 1);
        assert_eq!(opacity_applied.load(Ordering::SeqCst), 1);

        table.on_view_discarded(node);
        table.apply_dirty(|_| Some((layer.clone(), Some(PlatformViewId(1)))), |_| {});
        assert_eq!(src_applied.load(Ordering::SeqCst), 2, "requires-view attributes re-dirty on discard");
        assert_eq!(opacity_applied.load(Ordering::SeqCst), 1, "non-requires-view attributes stay untouched by discard");
    }

    fn assemble_border(parts: &[(&str, &AttributeValue)]) -> AttributeValue {
        let width = parts.iter().find(|(name, _)| *name == "borderWidth").and_then(|(_, v)| v.as_f64()).unwrap_or(0.0);
        AttributeValue::Border(mica_attributes::Border { width, color: None })
    }

    #[test]
    fn a_dirty_composite_part_assembles_the_whole_composite_before_dispatch() {
        use mica_attributes::{CompositeAttribute, CompositePart};

        let mut table = AttributeTable::new();
        let ids = ids();
        let border = ids.id_for_name("border");
        let border_width = ids.id_for_name("borderWidth");
        table.register_composite(CompositeAttribute::new(
            border,
            "border",
            vec![CompositePart { id: border_width, name: "borderWidth".into(), required: true }],
            assemble_border,
        ));

        let border_handler = AttributeHandler::new(border, "border", "View");
        let applied = Arc::new(AtomicUsize::new(0));
        let applied_values: Arc<std::sync::Mutex<Vec<AttributeValue>>> = Arc::new(std::sync::Mutex::new(Vec::new()));

        struct CapturingDelegate {
            count: Arc<AtomicUsize>,
            values: Arc<std::sync::Mutex<Vec<AttributeValue>>>,
        }
        impl AttributeHandlerDelegate<AttributeValue> for CapturingDelegate {
            fn apply(&self, _view: PlatformViewId, value: AttributeValue) -> Result<(), AttributeError> {
                self.count.fetch_add(1, Ordering::SeqCst);
                self.values.lock().unwrap().push(value);
                Ok(())
            }
            fn reset(&self, _view: PlatformViewId) -> Result<(), AttributeError> {
                Ok(())
            }
        }
        table.register_handler(&border_handler, Box::new(CapturingDelegate { count: applied.clone(), values: applied_values.clone() }));

        let node = ViewNodeId::default();
        table.set_attribute(node, border_width, AttributeOwner::INLINE, 0, AttributeValue::Double(3.0));

        let layer = LayerHandle::new(Layer::default());
        table.apply_dirty(|_| Some((layer.clone(), Some(PlatformViewId(1)))), |_| {});

        assert_eq!(applied.load(Ordering::SeqCst), 1, "a dirty part dispatches the assembled composite, not itself");
        assert_eq!(applied_values.lock().unwrap()[0], AttributeValue::Border(mica_attributes::Border { width: 3.0, color: None }));
    }
}
