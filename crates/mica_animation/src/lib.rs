//! Mica animation system: timing curves, value interpolators, and the two
//! built-in `Animation` implementations (time-based, spring-based) that a
//! `mica_core::Layer` can hold under a string key.

pub mod animation;
pub mod easing;
pub mod spring;
pub mod values;

pub use animation::{SpringAnimation, TimeAnimation};
pub use easing::{named as named_interpolator, CubicBezier, Interpolator, Linear, ViscousFluid};
pub use spring::SpringForce;
pub use values::{lerp, lerp_border_radius, lerp_color, lerp_frame, lerp_point, lerp_size};
