//! Value interpolators: blend primitive and compound values by ratio.
//!
//! Scalars, points, sizes, and frames blend linearly and extrapolate freely.
//! Color blending clamps its ratio to `[0,1]` and uses energy-preserving
//! channel mixing. Border radius interpolation is unit-aware per corner.

use mica_core::{BorderRadius, Color, CornerValue, Frame, Point, Size};

pub fn lerp(from: f64, to: f64, ratio: f64) -> f64 {
    from + (to - from) * ratio
}

pub fn lerp_point(from: Point, to: Point, ratio: f64) -> Point {
    Point::new(lerp(from.x, to.x, ratio), lerp(from.y, to.y, ratio))
}

pub fn lerp_size(from: Size, to: Size, ratio: f64) -> Size {
    Size::new(lerp(from.width, to.width, ratio), lerp(from.height, to.height, ratio))
}

pub fn lerp_frame(from: Frame, to: Frame, ratio: f64) -> Frame {
    Frame::new(
        lerp(from.x, to.x, ratio),
        lerp(from.y, to.y, ratio),
        lerp(from.width, to.width, ratio),
        lerp(from.height, to.height, ratio),
    )
}

fn blend_alpha(from: u8, to: u8, ratio: f64) -> u8 {
    let value = (1.0 - ratio) * from as f64 + ratio * to as f64;
    value.round() as u8
}

/// Energy-preserving channel blend: `√((1−r)·c₁² + r·c₂²)`, matching how
/// linear light (rather than gamma-encoded) values are usually mixed.
fn blend_channel(from: u8, to: u8, ratio: f64) -> u8 {
    let value = ((1.0 - ratio) * (from as f64).powi(2) + ratio * (to as f64).powi(2)).sqrt();
    value.round() as u8
}

/// Colors clamp their ratio to `[0,1]`; everything else extrapolates.
pub fn lerp_color(from: Color, to: Color, ratio: f64) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    Color::argb(
        blend_alpha(from.a, to.a, ratio),
        blend_channel(from.r, to.r, ratio),
        blend_channel(from.g, to.g, ratio),
        blend_channel(from.b, to.b, ratio),
    )
}

/// Interpolate one corner, resolving a percent/absolute unit mismatch by
/// converting `from` into `to`'s unit before blending — the result always
/// carries `to`'s percent flag.
fn lerp_corner(from: CornerValue, to: CornerValue, shortest_side: f64, ratio: f64) -> CornerValue {
    let blended = if from.is_percent == to.is_percent {
        lerp(from.magnitude, to.magnitude, ratio)
    } else if from.is_percent {
        let from_absolute = from.magnitude * shortest_side / 100.0;
        lerp(from_absolute, to.magnitude, ratio)
    } else {
        let from_percent = from.magnitude / shortest_side * 100.0;
        lerp(from_percent, to.magnitude, ratio)
    };
    CornerValue {
        magnitude: blended,
        is_percent: to.is_percent,
    }
}

/// Interpolate a border radius against the containing rect's shortest
/// side; the result's per-corner percent flags are inherited from `to`.
pub fn lerp_border_radius(from: BorderRadius, to: BorderRadius, bounds: Size, ratio: f64) -> BorderRadius {
    let shortest_side = bounds.shortest_side();
    BorderRadius::new(
        lerp_corner(from.top_left, to.top_left, shortest_side, ratio),
        lerp_corner(from.top_right, to.top_right, shortest_side, ratio),
        lerp_corner(from.bottom_right, to.bottom_right, shortest_side, ratio),
        lerp_corner(from.bottom_left, to.bottom_left, shortest_side, ratio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn interpolate_from_from_is_identity() {
        assert_eq!(lerp(3.0, 3.0, 0.37), 3.0);
        assert_eq!(lerp_point(Point::new(1.0, 2.0), Point::new(1.0, 2.0), 0.9), Point::new(1.0, 2.0));
        let c = Color::argb(10, 20, 30, 40);
        assert_eq!(lerp_color(c, c, 0.5), c);
    }

    #[test]
    fn color_interpolation_endpoints_are_exact() {
        let from = Color::argb(0, 10, 20, 30);
        let to = Color::argb(255, 200, 210, 220);
        assert_eq!(lerp_color(from, to, 0.0), from);
        assert_eq!(lerp_color(from, to, 1.0), to);
    }

    #[test]
    fn color_ratio_is_clamped() {
        let from = Color::argb(0, 0, 0, 0);
        let to = Color::argb(255, 255, 255, 255);
        assert_eq!(lerp_color(from, to, -5.0), from);
        assert_eq!(lerp_color(from, to, 5.0), to);
    }

    #[test]
    fn scalar_extrapolates_past_one() {
        assert_eq!(lerp(0.0, 10.0, 1.5), 15.0);
    }

    #[test]
    fn border_radius_percent_scenario() {
        let from = BorderRadius::new(
            CornerValue::percent(10.0),
            CornerValue::percent(20.0),
            CornerValue::percent(30.0),
            CornerValue::percent(40.0),
        );
        let to = BorderRadius::new(
            CornerValue::percent(14.0),
            CornerValue::percent(24.0),
            CornerValue::percent(34.0),
            CornerValue::percent(44.0),
        );
        let result = lerp_border_radius(from, to, Size::new(100.0, 100.0), 0.5);
        assert!((result.top_left.magnitude - 12.0).abs() < EPSILON);
        assert!((result.top_right.magnitude - 22.0).abs() < EPSILON);
        assert!((result.bottom_right.magnitude - 32.0).abs() < EPSILON);
        assert!((result.bottom_left.magnitude - 42.0).abs() < EPSILON);
        assert!(result.top_left.is_percent);
    }

    #[test]
    fn border_radius_cross_unit_scenario() {
        let from = BorderRadius::new(
            CornerValue::percent(20.0),
            CornerValue::percent(30.0),
            CornerValue::percent(40.0),
            CornerValue::percent(50.0),
        );
        let to = BorderRadius::new(
            CornerValue::absolute(20.0),
            CornerValue::absolute(30.0),
            CornerValue::absolute(40.0),
            CornerValue::absolute(50.0),
        );
        let result = lerp_border_radius(from, to, Size::new(200.0, 200.0), 0.5);
        assert!((result.top_left.magnitude - 30.0).abs() < EPSILON);
        assert!((result.top_right.magnitude - 45.0).abs() < EPSILON);
        assert!((result.bottom_right.magnitude - 60.0).abs() < EPSILON);
        assert!((result.bottom_left.magnitude - 75.0).abs() < EPSILON);
        assert!(!result.top_left.is_percent);
    }

    #[test]
    fn border_radius_endpoints_match_from_and_to() {
        let from = BorderRadius::uniform(CornerValue::absolute(10.0));
        let to = BorderRadius::uniform(CornerValue::absolute(20.0));
        let bounds = Size::new(50.0, 80.0);
        let at_start = lerp_border_radius(from, to, bounds, 0.0);
        let at_end = lerp_border_radius(from, to, bounds, 1.0);
        assert!((at_start.top_left.magnitude - 10.0).abs() < EPSILON);
        assert!((at_end.top_left.magnitude - 20.0).abs() < EPSILON);
    }
}
