//! Per-(node, attribute) lifecycle state: the dirty flag, pending
//! programmatically-animated value, and cached handler flags that sit on
//! top of `BoundAttributes`'s pure value resolution (spec.md §3's
//! `ViewNodeAttribute`, §4.9.4's materialize/discard/invalidate-layout
//! rules).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::bound::{AttributeOwner, BoundAttributes, DirtyTarget};
use crate::handler::AttributeHandler;
use crate::ids::AttributeId;
use crate::value::AttributeValue;

/// Handler flags worth caching per attribute rather than re-reading the
/// owning `AttributeHandler` on every dirty sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttributeFlags {
    pub requires_view: bool,
    pub invalidates_layout_on_change: bool,
    pub is_composite_part: bool,
}

impl From<&AttributeHandler> for AttributeFlags {
    fn from(handler: &AttributeHandler) -> Self {
        Self {
            requires_view: handler.requires_view(),
            invalidates_layout_on_change: handler.should_invalidate_layout_on_change(),
            is_composite_part: handler.is_composite_part(),
        }
    }
}

/// One node's attribute pipeline state: resolved values (via the embedded
/// `BoundAttributes`), which attributes are currently dirty and must
/// re-apply this tick, any value a running UI animation wants applied in
/// place of the resolved one, and the handler flags the attributes this
/// node has seen were registered with.
#[derive(Default)]
pub struct ViewNodeAttributes {
    bound: BoundAttributes,
    dirty: FxHashSet<AttributeId>,
    pending_animated: FxHashMap<AttributeId, AttributeValue>,
    flags: FxHashMap<AttributeId, AttributeFlags>,
}

impl ViewNodeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_flags(&mut self, attribute: AttributeId, flags: AttributeFlags) {
        self.flags.insert(attribute, flags);
    }

    pub fn flags(&self, attribute: AttributeId) -> AttributeFlags {
        self.flags.get(&attribute).copied().unwrap_or_default()
    }

    pub fn register_composite_part(&mut self, part: AttributeId, composite: AttributeId) {
        self.bound.register_composite_part(part, composite);
    }

    fn mark_dirty_target(&mut self, target: DirtyTarget) {
        let id = match target {
            DirtyTarget::Attribute(id) => id,
            DirtyTarget::Composite(id) => id,
        };
        self.dirty.insert(id);
    }

    /// Set `attribute`'s bound value from `owner` (spec.md §4.9.3 steps
    /// 1-2), marking the attribute (or its composite parent) dirty if the
    /// resolved value changed.
    pub fn set(&mut self, attribute: AttributeId, owner: AttributeOwner, priority: u32, raw: AttributeValue) {
        if let Some(target) = self.bound.set(attribute, owner, priority, raw) {
            self.mark_dirty_target(target);
        }
    }

    pub fn reset(&mut self, attribute: AttributeId, owner: AttributeOwner) {
        if let Some(target) = self.bound.remove(attribute, owner) {
            self.mark_dirty_target(target);
        }
    }

    /// Record the value a running UI animation wants applied this tick, in
    /// place of (without disturbing) the attribute's resolved bound value.
    pub fn set_pending_animated(&mut self, attribute: AttributeId, value: AttributeValue) {
        self.pending_animated.insert(attribute, value);
        self.dirty.insert(attribute);
    }

    pub fn resolved(&self, attribute: AttributeId) -> Option<&AttributeValue> {
        self.bound.resolved(attribute)
    }

    pub fn is_dirty(&self, attribute: AttributeId) -> bool {
        self.dirty.contains(&attribute)
    }

    pub fn has_any_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// View materialization: every attribute this node has ever bound
    /// re-applies from its resolved value, not animated. A value left
    /// pending by a now-stale animation is discarded so it can't leak into
    /// the reapplied frame (spec.md §4.9.4).
    pub fn mark_materialized(&mut self) {
        self.pending_animated.clear();
        let known: Vec<AttributeId> = self.flags.keys().copied().collect();
        self.dirty.extend(known);
    }

    /// View discard: attributes whose handler `requires-view` go dirty so
    /// they re-apply the next time this node gets a view back.
    pub fn mark_discarded(&mut self) {
        let requiring_view: Vec<AttributeId> = self
            .flags
            .iter()
            .filter(|(_, flags)| flags.requires_view)
            .map(|(id, _)| *id)
            .collect();
        self.dirty.extend(requiring_view);
    }

    /// Drain every dirty attribute, paired with the value that should be
    /// applied for it this tick: the pending animated value if one is
    /// waiting, otherwise the resolved bound value (`None` if neither is
    /// present, meaning the attribute should reset rather than apply).
    pub fn take_dirty(&mut self) -> Vec<(AttributeId, Option<AttributeValue>)> {
        let ids: Vec<AttributeId> = self.dirty.drain().collect();
        ids.into_iter()
            .map(|id| {
                let value = self.pending_animated.remove(&id).or_else(|| self.bound.resolved(id).cloned());
                (id, value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AttributeIds;

    fn flags(requires_view: bool) -> AttributeFlags {
        AttributeFlags { requires_view, invalidates_layout_on_change: false, is_composite_part: false }
    }

    #[test]
    fn setting_an_attribute_marks_it_dirty() {
        let ids = AttributeIds::new();
        let opacity = ids.id_for_name("opacity");
        let mut node = ViewNodeAttributes::new();
        node.set(opacity, AttributeOwner::INLINE, 0, AttributeValue::Double(0.5));
        assert!(node.is_dirty(opacity));
    }

    #[test]
    fn materializing_marks_every_registered_attribute_dirty_and_clears_pending_animated() {
        let ids = AttributeIds::new();
        let opacity = ids.id_for_name("opacity");
        let mut node = ViewNodeAttributes::new();
        node.register_flags(opacity, flags(false));
        node.set(opacity, AttributeOwner::INLINE, 0, AttributeValue::Double(0.5));
        node.take_dirty();
        node.set_pending_animated(opacity, AttributeValue::Double(0.9));
        assert!(node.is_dirty(opacity));

        node.mark_materialized();
        let dirty = node.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0], (opacity, Some(AttributeValue::Double(0.5))), "materialize reapplies the resolved value, not the pending animated one");
    }

    #[test]
    fn discarding_only_marks_requires_view_attributes_dirty() {
        let ids = AttributeIds::new();
        let src = ids.id_for_name("src");
        let opacity = ids.id_for_name("opacity");
        let mut node = ViewNodeAttributes::new();
        node.register_flags(src, flags(true));
        node.register_flags(opacity, flags(false));
        node.set(src, AttributeOwner::INLINE, 0, AttributeValue::String("a.png".into()));
        node.set(opacity, AttributeOwner::INLINE, 0, AttributeValue::Double(0.5));
        node.take_dirty();

        node.mark_discarded();
        let dirty: Vec<AttributeId> = node.take_dirty().into_iter().map(|(id, _)| id).collect();
        assert_eq!(dirty, vec![src]);
    }

    #[test]
    fn take_dirty_prefers_the_pending_animated_value_over_the_resolved_one() {
        let ids = AttributeIds::new();
        let opacity = ids.id_for_name("opacity");
        let mut node = ViewNodeAttributes::new();
        node.set(opacity, AttributeOwner::INLINE, 0, AttributeValue::Double(0.2));
        node.take_dirty();
        node.set_pending_animated(opacity, AttributeValue::Double(0.6));

        let dirty = node.take_dirty();
        assert_eq!(dirty, vec![(opacity, Some(AttributeValue::Double(0.6)))]);
    }
}
