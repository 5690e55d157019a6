//! The attribute-binding half of spec.md §6: how a view class registers
//! what it understands (`bindXxxAttribute`), how composite and scroll
//! attributes are wired up, and how a host contributes its own
//! preprocessors and a measure delegate.

use mica_attributes::{AttributeError, AttributeId, AttributeValue, CompositePart};
use mica_core::{PlatformViewId, Size};

/// Delegate a typed attribute binding invokes to apply a resolved value to
/// a concrete platform view. One delegate per view class per attribute.
pub trait AttributeHandlerDelegate<T> {
    fn apply(&self, view: PlatformViewId, value: T) -> Result<(), AttributeError>;
    fn reset(&self, view: PlatformViewId) -> Result<(), AttributeError>;
}

/// Measures a view class's intrinsic content size, for view classes whose
/// size depends on something the flexbox solver can't derive on its own
/// (text, images). Mirrors the original's `MeasureDelegate`.
pub trait MeasureDelegate {
    fn measure(&self, view: PlatformViewId, available: Size) -> Size;
}

/// What a view class publishes about the attributes it understands. The
/// `bindXxxAttribute` family from spec.md §6, modeled as methods on a
/// trait a view-class registration implements, rather than free functions,
/// so a view class's full binding table is visible at one call site.
pub trait AttributeBinder {
    fn bind_bool_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<bool>>);
    fn bind_int_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<i64>>);
    fn bind_double_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<f64>>);
    fn bind_string_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<String>>);
    fn bind_color_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<mica_core::Color>>);
    fn bind_percent_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<mica_core::CornerValue>>);
    fn bind_border_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<mica_attributes::Border>>);
    fn bind_text_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<String>>);
    /// Escape hatch for attributes whose resolved type doesn't fit the
    /// typed bindings above (e.g. a custom composite assembled elsewhere).
    fn bind_untyped_attribute(&mut self, name: &str, invalidate_layout: bool, delegate: Box<dyn AttributeHandlerDelegate<AttributeValue>>);

    /// Register a composite attribute's parts and the delegate that
    /// assembles and applies them once all required parts resolve.
    fn bind_composite_attribute(&mut self, name: &str, parts: Vec<CompositePart>, delegate: Box<dyn AttributeHandlerDelegate<AttributeValue>>);

    /// A scrollable view class opts into the fixed set of scroll attributes
    /// (`contentOffsetX/Y`, paging, bounces, fading edges, ...) in one call.
    fn bind_scroll_attributes(&mut self);

    /// An asset-bearing view class (`src`) opts into asset resolution,
    /// producing `output_type`-shaped `LoadedAsset`s.
    fn bind_asset_attributes(&mut self, output_type: &'static str);

    /// Register a host-supplied preprocessor for an attribute the engine
    /// doesn't already have a built-in grammar for.
    fn register_preprocessor(&mut self, name: &str, enable_cache: bool, preprocessor: mica_attributes::Preprocessor);

    fn set_measure_delegate(&mut self, delegate: Box<dyn MeasureDelegate>);
}

/// Which typed binding call a `RecordingAttributeBinder` observed — a test
/// double's record of what a view class registered, not a runtime type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedBinding {
    Bool(String),
    Int(String),
    Double(String),
    String(String),
    Color(String),
    Percent(String),
    Border(String),
    Text(String),
    Untyped(String),
    Composite(String),
    Scroll,
    Asset(&'static str),
    Preprocessor(String),
    MeasureDelegate,
}

/// Records every binding call instead of wiring up a real view class.
/// Used to assert a view class registered exactly the attributes it
/// claims to support.
#[derive(Default)]
pub struct RecordingAttributeBinder {
    pub bindings: Vec<RecordedBinding>,
}

impl RecordingAttributeBinder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttributeBinder for RecordingAttributeBinder {
    fn bind_bool_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<bool>>) {
        self.bindings.push(RecordedBinding::Bool(name.to_string()));
    }

    fn bind_int_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<i64>>) {
        self.bindings.push(RecordedBinding::Int(name.to_string()));
    }

    fn bind_double_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<f64>>) {
        self.bindings.push(RecordedBinding::Double(name.to_string()));
    }

    fn bind_string_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<String>>) {
        self.bindings.push(RecordedBinding::String(name.to_string()));
    }

    fn bind_color_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<mica_core::Color>>) {
        self.bindings.push(RecordedBinding::Color(name.to_string()));
    }

    fn bind_percent_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<mica_core::CornerValue>>) {
        self.bindings.push(RecordedBinding::Percent(name.to_string()));
    }

    fn bind_border_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<mica_attributes::Border>>) {
        self.bindings.push(RecordedBinding::Border(name.to_string()));
    }

    fn bind_text_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<String>>) {
        self.bindings.push(RecordedBinding::Text(name.to_string()));
    }

    fn bind_untyped_attribute(&mut self, name: &str, _invalidate_layout: bool, _delegate: Box<dyn AttributeHandlerDelegate<AttributeValue>>) {
        self.bindings.push(RecordedBinding::Untyped(name.to_string()));
    }

    fn bind_composite_attribute(&mut self, name: &str, _parts: Vec<CompositePart>, _delegate: Box<dyn AttributeHandlerDelegate<AttributeValue>>) {
        self.bindings.push(RecordedBinding::Composite(name.to_string()));
    }

    fn bind_scroll_attributes(&mut self) {
        self.bindings.push(RecordedBinding::Scroll);
    }

    fn bind_asset_attributes(&mut self, output_type: &'static str) {
        self.bindings.push(RecordedBinding::Asset(output_type));
    }

    fn register_preprocessor(&mut self, name: &str, _enable_cache: bool, _preprocessor: mica_attributes::Preprocessor) {
        self.bindings.push(RecordedBinding::Preprocessor(name.to_string()));
    }

    fn set_measure_delegate(&mut self, _delegate: Box<dyn MeasureDelegate>) {
        self.bindings.push(RecordedBinding::MeasureDelegate);
    }
}
