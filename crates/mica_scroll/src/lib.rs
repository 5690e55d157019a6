//! Scroll physics and the layers built on them: Android spline / iOS decay
//! fling, spring-driven overscroll bounce, the scrollable container, and
//! the animated-image layer.

pub mod animation;
pub mod carried_velocity;
pub mod decay;
pub mod image_layer;
pub mod scroll_layer;
pub mod scroller;
pub mod spline;
pub mod spring_bounce;
pub mod tunables;

pub use animation::{AndroidContentOffsetAnimation, FlingAnimation, IosContentOffsetAnimation, ScrollAnimationAdapter, ScrollUpdate};
pub use carried_velocity::{AndroidCarriedVelocity, IosCarriedVelocity};
pub use image_layer::{AnimatedImageLayerHandle, AnimatedImageLayerListener, AnimatedImageSource};
pub use scroll_layer::{direction_aware_leading_trailing, rubber_band, ScrollLayerHandle, ScrollListener, ScrollPerfLogger, SCROLL_ANIMATION_KEY};
pub use scroller::{AndroidScroller, DragPhase, IosScroller, Scroller, DEFAULT_SCROLL_FRICTION};
pub use spline::{SplinePhysics, SplineResult};
pub use spring_bounce::{SpringBounceConfig, SpringBouncePhysics, SpringBounceResult};
