//! Core data model and presentation tree for the Mica runtime: geometry,
//! color, the `Layer`/`ViewNode` tree, and accessibility tree derivation.
//!
//! Layout (flexbox), rasterization, and the platform view bridge are
//! external collaborators specified only via traits (`mica_platform`,
//! `Canvas` below) — this crate owns none of them.

pub mod accessibility;
pub mod canvas;
pub mod color;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod view_node;

pub use accessibility::{derive as derive_accessibility_tree, AccessibilityNode};
pub use canvas::{Canvas, DrawCommand};
pub use color::{BorderRadius, Color, CornerValue};
pub use error::CoreError;
pub use geometry::{Duration, Frame, Point, Size, Vector};
pub use layer::{Animation, AnimationKey, Direction, Layer, LayerHandle, TickResult, Transform};
pub use view_node::{
    AccessibilityRole, AccessibilityState, PlatformViewId, ViewNode, ViewNodeHandle, ViewNodeId,
    ViewTree,
};
