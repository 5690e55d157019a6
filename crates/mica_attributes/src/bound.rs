//! Per-(node, attribute) value resolution across multiple owners
//! (spec.md §4.9.3), grounded in `AttributeValueCollection`'s "resolved
//! index always points at the lowest-priority entry" invariant.

use rustc_hash::FxHashMap;

use crate::ids::AttributeId;
use crate::value::AttributeValue;

/// An opaque source of attribute values (style sheet, inline, animation).
/// Lower priority wins ties, matching the original's "lowest owner-priority"
/// resolution rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeOwner(pub u32);

impl AttributeOwner {
    /// Priorities below this are reserved for style-sheet rule ranks; the
    /// inline owner always wins over any style rule.
    pub const INLINE: AttributeOwner = AttributeOwner(0);
}

#[derive(Clone, Debug)]
struct Entry {
    owner: AttributeOwner,
    priority: u32,
    raw: AttributeValue,
}

/// All registered `(owner -> value)` entries for one attribute on one node,
/// plus a cached resolved index. The resolved entry is always the one with
/// the lowest `priority` among entries currently present.
#[derive(Default)]
pub struct AttributeValueCollection {
    entries: Vec<Entry>,
    resolved: Option<usize>,
}

impl AttributeValueCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set (or replace) the value from `owner`. Returns whether the
    /// resolved index changed as a result — the caller's cue to mark the
    /// attribute (or its composite parent) dirty.
    pub fn set(&mut self, owner: AttributeOwner, priority: u32, raw: AttributeValue) -> bool {
        let previous = self.resolved_raw().cloned();
        if let Some(existing) = self.entries.iter_mut().find(|entry| entry.owner == owner) {
            existing.priority = priority;
            existing.raw = raw;
        } else {
            self.entries.push(Entry { owner, priority, raw });
        }
        self.update_resolved_index();
        self.resolved_raw() != previous.as_ref()
    }

    /// Remove `owner`'s entry, if any. Returns whether the resolved index
    /// changed (spec.md §8: "resetting the highest-priority owner's
    /// attribute leaves the resolved value equal to the next-priority
    /// owner's value").
    pub fn remove(&mut self, owner: AttributeOwner) -> bool {
        let previous = self.resolved_raw().cloned();
        self.entries.retain(|entry| entry.owner != owner);
        self.update_resolved_index();
        self.resolved_raw() != previous.as_ref()
    }

    fn update_resolved_index(&mut self) {
        self.resolved = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| entry.priority)
            .map(|(index, _)| index);
    }

    pub fn resolved_raw(&self) -> Option<&AttributeValue> {
        self.resolved.map(|index| &self.entries[index].raw)
    }

    pub fn resolved_owner(&self) -> Option<AttributeOwner> {
        self.resolved.map(|index| self.entries[index].owner)
    }
}

/// Dirty-tracking outcome of a `set`/`remove` call the caller must act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirtyTarget {
    /// The attribute itself is dirty and should re-apply.
    Attribute(AttributeId),
    /// The attribute is a composite part; its composite parent is dirty.
    Composite(AttributeId),
}

/// All bound attribute state for one view node: one `AttributeValueCollection`
/// per attribute id that has ever been set, plus which ids are composite
/// parts (and of which composite) so a part change routes dirtiness to the
/// composite instead of applying directly.
#[derive(Default)]
pub struct BoundAttributes {
    values: FxHashMap<AttributeId, AttributeValueCollection>,
    composite_part_of: FxHashMap<AttributeId, AttributeId>,
}

impl BoundAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_composite_part(&mut self, part: AttributeId, composite: AttributeId) {
        self.composite_part_of.insert(part, composite);
    }

    pub fn collection(&self, attribute: AttributeId) -> Option<&AttributeValueCollection> {
        self.values.get(&attribute)
    }

    /// Set `attribute`'s value from `owner`. Returns the dirty target to
    /// mark, or `None` if the resolved value didn't change.
    pub fn set(&mut self, attribute: AttributeId, owner: AttributeOwner, priority: u32, raw: AttributeValue) -> Option<DirtyTarget> {
        let changed = self.values.entry(attribute).or_default().set(owner, priority, raw);
        changed.then(|| self.dirty_target(attribute))
    }

    pub fn remove(&mut self, attribute: AttributeId, owner: AttributeOwner) -> Option<DirtyTarget> {
        let changed = self.values.entry(attribute).or_default().remove(owner);
        changed.then(|| self.dirty_target(attribute))
    }

    fn dirty_target(&self, attribute: AttributeId) -> DirtyTarget {
        match self.composite_part_of.get(&attribute) {
            Some(&composite) => DirtyTarget::Composite(composite),
            None => DirtyTarget::Attribute(attribute),
        }
    }

    pub fn resolved(&self, attribute: AttributeId) -> Option<&AttributeValue> {
        self.values.get(&attribute).and_then(AttributeValueCollection::resolved_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AttributeIds;

    fn string(s: &str) -> AttributeValue {
        AttributeValue::String(s.to_string())
    }

    #[test]
    fn lowest_priority_owner_wins() {
        let mut collection = AttributeValueCollection::new();
        collection.set(AttributeOwner(1), 10, string("from-style"));
        collection.set(AttributeOwner(2), 5, string("from-inline"));
        assert_eq!(collection.resolved_raw(), Some(&string("from-inline")));
    }

    #[test]
    fn removing_the_winning_owner_falls_back_to_next_priority() {
        let mut collection = AttributeValueCollection::new();
        collection.set(AttributeOwner(1), 10, string("from-style"));
        collection.set(AttributeOwner(2), 5, string("from-inline"));
        let changed = collection.remove(AttributeOwner(2));
        assert!(changed);
        assert_eq!(collection.resolved_raw(), Some(&string("from-style")));
    }

    #[test]
    fn setting_an_unrelated_owner_to_a_lower_priority_value_does_not_report_change() {
        let mut collection = AttributeValueCollection::new();
        collection.set(AttributeOwner(1), 5, string("winner"));
        let changed = collection.set(AttributeOwner(2), 10, string("loser"));
        assert!(!changed);
    }

    #[test]
    fn composite_part_change_routes_dirtiness_to_the_composite() {
        let ids = AttributeIds::new();
        let border = ids.id_for_name("border");
        let border_width = ids.id_for_name("borderWidth");
        let mut bound = BoundAttributes::new();
        bound.register_composite_part(border_width, border);
        let target = bound.set(border_width, AttributeOwner::INLINE, 0, AttributeValue::Double(2.0));
        assert_eq!(target, Some(DirtyTarget::Composite(border)));
    }

    #[test]
    fn plain_attribute_change_routes_dirtiness_to_itself() {
        let ids = AttributeIds::new();
        let opacity = ids.id_for_name("opacity");
        let mut bound = BoundAttributes::new();
        let target = bound.set(opacity, AttributeOwner::INLINE, 0, AttributeValue::Double(0.5));
        assert_eq!(target, Some(DirtyTarget::Attribute(opacity)));
    }
}
