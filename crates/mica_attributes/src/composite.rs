//! Composite attributes: a single logical attribute (`border`, `boxShadow`)
//! assembled from several parts (`borderWidth`, `borderColor`, ...), each of
//! which is itself an ordinary handler marked `mark_as_composite_part`.
//! Grounded in `valdi/runtime/Attributes/CompositeAttribute.hpp`.

use rustc_hash::FxHashMap;

use crate::ids::AttributeId;
use crate::value::AttributeValue;

/// One named slot of a composite, e.g. `width`/`color` for `border`.
#[derive(Clone, Debug)]
pub struct CompositePart {
    pub id: AttributeId,
    pub name: String,
    pub required: bool,
}

/// Assembles the parts' resolved values into the composite's own resolved
/// value. Runs after every part has either a current value or, for an
/// unset optional part, is simply absent from `parts`.
pub type Assembler = fn(&[(&str, &AttributeValue)]) -> AttributeValue;

/// `border`, `boxShadow`, `textShadow` and similar: attributes whose
/// resolved value is a function of several independently-set sub-attributes
/// rather than a single raw string.
pub struct CompositeAttribute {
    id: AttributeId,
    name: String,
    parts: Vec<CompositePart>,
    assemble: Assembler,
}

impl CompositeAttribute {
    pub fn new(id: AttributeId, name: impl Into<String>, parts: Vec<CompositePart>, assemble: Assembler) -> Self {
        Self { id, name: name.into(), parts, assemble }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parts(&self) -> &[CompositePart] {
        &self.parts
    }

    pub fn required_parts(&self) -> impl Iterator<Item = &CompositePart> {
        self.parts.iter().filter(|part| part.required)
    }

    /// Assemble the composite's value from its currently-resolved parts.
    /// `values` need only contain entries for parts that currently have a
    /// value; a missing required part is the caller's cue to reset the
    /// whole composite rather than assemble a partial result
    /// (spec.md §4.9.1's "missing-required-part reset" rule).
    pub fn assemble(&self, values: &FxHashMap<&str, AttributeValue>) -> Option<AttributeValue> {
        for part in self.required_parts() {
            if !values.contains_key(part.name.as_str()) {
                return None;
            }
        }
        let entries: Vec<(&str, &AttributeValue)> = self
            .parts
            .iter()
            .filter_map(|part| values.get(part.name.as_str()).map(|value| (part.name.as_str(), value)))
            .collect();
        Some((self.assemble)(&entries))
    }
}
