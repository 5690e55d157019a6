//! Timing curves: map normalized time `t ∈ [0,1]` to an eased ratio.
//!
//! Named curves are generalized from a fixed enum to a trait — the bezier
//! and viscous-fluid curves don't collapse cleanly into the same shape, and
//! a trait lets either be stored as `Arc<dyn Interpolator>` on an animation.

use std::sync::Arc;

/// `f(t) -> t'` with `f(0)=0` and `f(1)=1` (within floating-point
/// tolerance) for `t ∈ [0,1]`.
pub trait Interpolator: Send + Sync {
    fn ease(&self, t: f64) -> f64;
}

impl<F: Fn(f64) -> f64 + Send + Sync> Interpolator for F {
    fn ease(&self, t: f64) -> f64 {
        self(t)
    }
}

/// `f(t) = t`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Linear;

impl Interpolator for Linear {
    fn ease(&self, t: f64) -> f64 {
        t
    }
}

/// A cubic-Bezier timing curve with fixed anchors at `(0,0)` and `(1,1)`
/// and two free control points `(p1x, p1y)`, `(p2x, p2y)`.
///
/// Evaluation is a two-step inversion: solve the parametric Bezier in `x`
/// for the Bezier parameter via Newton-Raphson (falling back to bisection
/// if the derivative is too flat), then evaluate `y` at that parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    p1x: f64,
    p1y: f64,
    p2x: f64,
    p2y: f64,
}

impl CubicBezier {
    pub const fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        Self { p1x, p1y, p2x, p2y }
    }

    /// `(0.25, 0.1, 0.25, 1.0)` — CoreAnimation's `.default`.
    pub const fn system_default() -> Self {
        Self::new(0.25, 0.1, 0.25, 1.0)
    }

    /// `(0.42, 0, 1, 1)` — CoreAnimation's `.easeIn`.
    pub const fn ease_in() -> Self {
        Self::new(0.42, 0.0, 1.0, 1.0)
    }

    /// `(0, 0, 0.58, 1)` — CoreAnimation's `.easeOut`.
    pub const fn ease_out() -> Self {
        Self::new(0.0, 0.0, 0.58, 1.0)
    }

    /// `(0.42, 0, 0.58, 1)` — CoreAnimation's `.easeInEaseOut`.
    pub const fn ease_in_out() -> Self {
        Self::new(0.42, 0.0, 0.58, 1.0)
    }

    /// `(0.9, 0.9, 0.95, 1)`.
    pub const fn strong_ease_out() -> Self {
        Self::new(0.9, 0.9, 0.95, 1.0)
    }

    fn bezier_component(t: f64, p1: f64, p2: f64) -> f64 {
        let mt = 1.0 - t;
        3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
    }

    fn bezier_component_derivative(t: f64, p1: f64, p2: f64) -> f64 {
        let mt = 1.0 - t;
        3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Solve `bezier_component(t, p1x, p2x) == x` for `t`.
    fn solve_t_for_x(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        let mut t = x;
        for _ in 0..8 {
            let current_x = Self::bezier_component(t, self.p1x, self.p2x) - x;
            let derivative = Self::bezier_component_derivative(t, self.p1x, self.p2x);
            if derivative.abs() < 1e-6 {
                break;
            }
            t -= current_x / derivative;
        }

        if (Self::bezier_component(t, self.p1x, self.p2x) - x).abs() < 1e-6 {
            return t.clamp(0.0, 1.0);
        }

        // Bisection fallback for pathological control points.
        let (mut lo, mut hi) = (0.0f64, 1.0f64);
        let mut mid = x;
        for _ in 0..30 {
            mid = (lo + hi) / 2.0;
            let value = Self::bezier_component(mid, self.p1x, self.p2x);
            if (value - x).abs() < 1e-7 {
                break;
            }
            if value < x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        mid
    }
}

impl Interpolator for CubicBezier {
    fn ease(&self, t: f64) -> f64 {
        let param = self.solve_t_for_x(t);
        Self::bezier_component(param, self.p1y, self.p2y)
    }
}

/// Android's viscous-fluid scroll curve: `x − (1−e^(−x))` below `x=1`,
/// `0.367879 + (1−e^(1−x))·0.632120` above, normalized so `f(1)=1` exactly
/// with an offset correcting the residual floating-point error.
#[derive(Clone, Copy, Debug)]
pub struct ViscousFluid {
    scale: f64,
    normalize: f64,
    offset: f64,
}

impl ViscousFluid {
    pub fn new() -> Self {
        let scale = 8.0;
        let raw_at_one = Self::viscous_fluid_raw(1.0, scale);
        let normalize = 1.0 / raw_at_one;
        let offset = 1.0 - normalize * raw_at_one;
        Self {
            scale,
            normalize,
            offset,
        }
    }

    fn viscous_fluid_raw(x: f64, scale: f64) -> f64 {
        let x = x * scale;
        if x < 1.0 {
            x - (1.0 - (-x).exp())
        } else {
            const START: f64 = 0.367_879_441_17;
            let x = 1.0 - (1.0 - x).exp();
            START + x * (1.0 - START)
        }
    }
}

impl Default for ViscousFluid {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolator for ViscousFluid {
    fn ease(&self, t: f64) -> f64 {
        let interpolated = self.normalize * Self::viscous_fluid_raw(t, self.scale);
        if interpolated > 0.0 {
            interpolated + self.offset
        } else {
            interpolated
        }
    }
}

/// Convenience: boxes a named curve behind `Arc<dyn Interpolator>` so
/// callers configuring an animation don't need to know the concrete type.
pub fn named(name: &str) -> Option<Arc<dyn Interpolator>> {
    Some(match name {
        "linear" => Arc::new(Linear),
        "default" => Arc::new(CubicBezier::system_default()),
        "ease-in" => Arc::new(CubicBezier::ease_in()),
        "ease-out" => Arc::new(CubicBezier::ease_out()),
        "ease-in-out" => Arc::new(CubicBezier::ease_in_out()),
        "strong-ease-out" => Arc::new(CubicBezier::strong_ease_out()),
        "viscous-fluid" => Arc::new(ViscousFluid::new()),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-4;

    #[test]
    fn linear_is_identity() {
        assert_eq!(Linear.ease(0.0), 0.0);
        assert_eq!(Linear.ease(0.5), 0.5);
        assert_eq!(Linear.ease(1.0), 1.0);
    }

    #[test]
    fn bezier_curves_pin_endpoints() {
        for curve in [
            CubicBezier::system_default(),
            CubicBezier::ease_in(),
            CubicBezier::ease_out(),
            CubicBezier::ease_in_out(),
            CubicBezier::strong_ease_out(),
        ] {
            assert!((curve.ease(0.0) - 0.0).abs() < EPSILON);
            assert!((curve.ease(1.0) - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn bezier_ease_in_starts_slow() {
        let curve = CubicBezier::ease_in();
        // An ease-in curve lags behind linear time early on.
        assert!(curve.ease(0.25) < 0.25);
    }

    #[test]
    fn viscous_fluid_pins_endpoints() {
        let curve = ViscousFluid::new();
        assert!((curve.ease(0.0) - 0.0).abs() < EPSILON);
        assert!((curve.ease(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn named_resolves_known_curves_and_rejects_unknown() {
        assert!(named("linear").is_some());
        assert!(named("viscous-fluid").is_some());
        assert!(named("not-a-curve").is_none());
    }
}
