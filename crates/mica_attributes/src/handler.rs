//! Per-attribute handler: preprocessor/postprocessor chains, the
//! preprocessor cache, and the apply/reset entry points a binding invokes.
//! Grounded in `valdi/runtime/Attributes/AttributeHandler.hpp`.

use std::collections::HashMap;
use std::sync::Mutex;

use smallvec::SmallVec;
use tracing::debug;

use crate::error::AttributeError;
use crate::ids::AttributeId;
use crate::value::AttributeValue;

#[cfg(test)]
fn test_id(name: &str) -> AttributeId {
    crate::ids::AttributeIds::new().id_for_name(name)
}

/// A preprocessor turns a raw attribute value (usually a string) into a
/// resolved `AttributeValue`. Most handlers have exactly one; composite
/// parts and a few legacy attributes chain more than one, hence the
/// `SmallVec` the original also uses.
pub type Preprocessor = fn(&AttributeValue) -> Result<AttributeValue, String>;

/// A postprocessor runs after preprocessing on every resolution, not just
/// on change — used for RTL mirroring, which depends on layout direction
/// and must be able to flip on a direction change alone.
pub type Postprocessor = fn(AttributeValue) -> AttributeValue;

/// Cheap structural fingerprint of a raw value, used as the preprocessor
/// cache key. Two equal raw values always fingerprint equal; collisions
/// across different values are acceptable only if they're also equal, so
/// this must stay a lossless encoding of `AttributeValue`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Fingerprint {
    Null,
    Bool(bool),
    Int(i64),
    Double(u64),
    String(String),
}

fn fingerprint(value: &AttributeValue) -> Option<Fingerprint> {
    match value {
        AttributeValue::Null => Some(Fingerprint::Null),
        AttributeValue::Bool(b) => Some(Fingerprint::Bool(*b)),
        AttributeValue::Int(i) => Some(Fingerprint::Int(*i)),
        AttributeValue::Double(d) => Some(Fingerprint::Double(d.to_bits())),
        AttributeValue::String(s) => Some(Fingerprint::String(s.clone())),
        // Already-resolved values never recur as raw input, so they never
        // need a cache entry.
        _ => None,
    }
}

/// A plain `HashMap` keyed by value fingerprint. The original keeps this
/// weak so an unused entry can be reclaimed under memory pressure; a
/// process-local handler table is small enough that the distinction isn't
/// observable, so this is a deliberate simplification (see DESIGN.md).
#[derive(Default)]
struct PreprocessorCache {
    enabled: bool,
    entries: HashMap<Fingerprint, AttributeValue>,
}

/// One view class's configuration for one attribute name: how to turn the
/// raw value into a resolved one, how to apply it, and the handful of
/// flags the scheduler and layout engine consult.
pub struct AttributeHandler {
    id: AttributeId,
    name: String,
    class: String,
    preprocessors: SmallVec<[Preprocessor; 1]>,
    postprocessors: Vec<Postprocessor>,
    composite: Option<AttributeId>,
    cache: Mutex<PreprocessorCache>,
    requires_view: bool,
    invalidates_layout_on_change: bool,
    reevaluate_on_color_palette_change: bool,
    is_composite_part: bool,
}

impl AttributeHandler {
    pub fn new(id: AttributeId, name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class: class.into(),
            preprocessors: SmallVec::new(),
            postprocessors: Vec::new(),
            composite: None,
            cache: Mutex::new(PreprocessorCache { enabled: true, entries: HashMap::new() }),
            requires_view: false,
            invalidates_layout_on_change: false,
            reevaluate_on_color_palette_change: false,
            is_composite_part: false,
        }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn append_preprocessor(&mut self, preprocessor: Preprocessor) -> &mut Self {
        self.preprocessors.push(preprocessor);
        self
    }

    pub fn prepend_preprocessor(&mut self, preprocessor: Preprocessor) -> &mut Self {
        self.preprocessors.insert(0, preprocessor);
        self
    }

    pub fn append_postprocessor(&mut self, postprocessor: Postprocessor) -> &mut Self {
        self.postprocessors.push(postprocessor);
        self
    }

    pub fn set_composite(&mut self, composite: AttributeId) -> &mut Self {
        self.composite = Some(composite);
        self.is_composite_part = false;
        self
    }

    pub fn mark_as_composite_part(&mut self) -> &mut Self {
        self.is_composite_part = true;
        self
    }

    pub fn set_requires_view(&mut self, requires_view: bool) -> &mut Self {
        self.requires_view = requires_view;
        self
    }

    pub fn set_invalidates_layout_on_change(&mut self, invalidates: bool) -> &mut Self {
        self.invalidates_layout_on_change = invalidates;
        self
    }

    pub fn set_reevaluate_on_color_palette_change(&mut self, reevaluate: bool) -> &mut Self {
        self.reevaluate_on_color_palette_change = reevaluate;
        self
    }

    pub fn set_enable_preprocessor_cache(&mut self, enabled: bool) -> &mut Self {
        self.cache.lock().unwrap().enabled = enabled;
        self
    }

    pub fn requires_view(&self) -> bool {
        self.requires_view
    }

    pub fn should_invalidate_layout_on_change(&self) -> bool {
        self.invalidates_layout_on_change
    }

    pub fn should_reevaluate_on_color_palette_change(&self) -> bool {
        self.reevaluate_on_color_palette_change
    }

    pub fn is_composite_part(&self) -> bool {
        self.is_composite_part
    }

    pub fn composite_attribute(&self) -> Option<AttributeId> {
        self.composite
    }

    pub fn has_preprocessors(&self) -> bool {
        !self.preprocessors.is_empty()
    }

    /// Cheap to call repeatedly: a handler with zero preprocessors and zero
    /// postprocessors is "trivial" and the pipeline may pass the raw value
    /// straight through without touching the cache.
    pub fn is_preprocessing_trivial(&self) -> bool {
        self.preprocessors.is_empty() && self.postprocessors.is_empty()
    }

    pub fn clear_preprocessor_cache(&self) {
        self.cache.lock().unwrap().entries.clear();
    }

    /// Run the preprocessor chain, consulting and populating the cache.
    pub fn preprocess(&self, raw: &AttributeValue) -> Result<AttributeValue, AttributeError> {
        if self.is_preprocessing_trivial() {
            return Ok(raw.clone());
        }
        let key = fingerprint(raw);
        if let Some(key) = &key {
            let cache = self.cache.lock().unwrap();
            if cache.enabled {
                if let Some(cached) = cache.entries.get(key) {
                    return Ok(cached.clone());
                }
            }
        }
        let resolved = self.preprocess_without_cache(raw)?;
        if let Some(key) = key {
            let mut cache = self.cache.lock().unwrap();
            if cache.enabled {
                cache.entries.insert(key, resolved.clone());
            }
        }
        Ok(resolved)
    }

    /// Run the preprocessor chain unconditionally, bypassing the cache.
    pub fn preprocess_without_cache(&self, raw: &AttributeValue) -> Result<AttributeValue, AttributeError> {
        let mut value = raw.clone();
        for preprocessor in &self.preprocessors {
            value = preprocessor(&value).map_err(|message| {
                debug!(class = %self.class, attribute = %self.name, %message, "preprocessor failed");
                AttributeError::ParseFailure {
                    class: self.class.clone(),
                    attribute: self.name.clone(),
                    raw: format!("{raw:?}"),
                    message,
                }
            })?;
        }
        Ok(value)
    }

    /// Run the postprocessor chain on an already-preprocessed value. Unlike
    /// preprocessing this always runs, since postprocessors react to
    /// ambient state (layout direction) rather than the raw value alone.
    pub fn postprocess(&self, value: AttributeValue) -> AttributeValue {
        self.postprocessors.iter().fold(value, |value, postprocessor| postprocessor(value))
    }

    /// The full apply path: preprocess then postprocess. Binding code calls
    /// this rather than the two steps separately.
    pub fn apply(&self, raw: &AttributeValue) -> Result<AttributeValue, AttributeError> {
        let preprocessed = self.preprocess(raw)?;
        Ok(self.postprocess(preprocessed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessors::preprocess_color;

    fn string(s: &str) -> AttributeValue {
        AttributeValue::String(s.to_string())
    }

    #[test]
    fn trivial_handler_passes_the_raw_value_through() {
        let handler = AttributeHandler::new(test_id("attr"), "opacity", "View");
        assert!(handler.is_preprocessing_trivial());
        assert_eq!(handler.apply(&AttributeValue::Double(0.5)).unwrap(), AttributeValue::Double(0.5));
    }

    #[test]
    fn preprocessor_failure_becomes_a_parse_failure_error() {
        let mut handler = AttributeHandler::new(test_id("attr"), "backgroundColor", "View");
        handler.append_preprocessor(preprocess_color);
        let err = handler.apply(&string("not-a-color")).unwrap_err();
        match err {
            AttributeError::ParseFailure { attribute, .. } => assert_eq!(attribute, "backgroundColor"),
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn repeated_preprocessing_hits_the_cache() {
        let mut handler = AttributeHandler::new(test_id("attr"), "backgroundColor", "View");
        handler.append_preprocessor(preprocess_color);
        let first = handler.preprocess(&string("#ff0000")).unwrap();
        let second = handler.preprocess(&string("#ff0000")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn disabling_the_cache_still_produces_correct_results() {
        let mut handler = AttributeHandler::new(test_id("attr"), "backgroundColor", "View");
        handler.append_preprocessor(preprocess_color);
        handler.set_enable_preprocessor_cache(false);
        assert!(handler.preprocess(&string("#00ff00")).is_ok());
    }
}
