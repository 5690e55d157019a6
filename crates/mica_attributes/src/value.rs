//! The untyped attribute value flowing through preprocess/postprocess,
//! grounded in `valdi/runtime/Attributes/AttributeValue.hpp`'s variant.

use mica_core::{BorderRadius, Color};

/// Eight-way gradient angle, snapped in pi/4 steps from top-bottom
/// clockwise (spec.md §4.9.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientAngle {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl GradientAngle {
    /// Snap an arbitrary degree value (0 = top, clockwise) to the nearest
    /// of the eight directions.
    pub fn snap_degrees(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let index = ((normalized / 45.0).round() as i64).rem_euclid(8);
        match index {
            0 => GradientAngle::Top,
            1 => GradientAngle::TopRight,
            2 => GradientAngle::Right,
            3 => GradientAngle::BottomRight,
            4 => GradientAngle::Bottom,
            5 => GradientAngle::BottomLeft,
            6 => GradientAngle::Left,
            _ => GradientAngle::TopLeft,
        }
    }

    /// Mirror horizontally, the `background`/`textGradient` RTL postprocessor.
    pub fn mirrored(self) -> Self {
        match self {
            GradientAngle::Top => GradientAngle::Top,
            GradientAngle::TopRight => GradientAngle::TopLeft,
            GradientAngle::Right => GradientAngle::Left,
            GradientAngle::BottomRight => GradientAngle::BottomLeft,
            GradientAngle::Bottom => GradientAngle::Bottom,
            GradientAngle::BottomLeft => GradientAngle::BottomRight,
            GradientAngle::Left => GradientAngle::Right,
            GradientAngle::TopLeft => GradientAngle::TopRight,
        }
    }
}

/// The resolved form of `background`/`textGradient`: either a single color
/// (`locations`/`angle` unused) or a multi-stop gradient.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub colors: Vec<Color>,
    pub locations: Vec<f64>,
    pub angle: GradientAngle,
    pub radial: bool,
}

impl Gradient {
    pub fn solid(color: Color) -> Self {
        Self {
            colors: vec![color],
            locations: Vec::new(),
            angle: GradientAngle::Bottom,
            radial: false,
        }
    }
}

/// The resolved form of `border`: a width and an optional stroke color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub width: f64,
    pub color: Option<Color>,
}

/// The resolved form of `boxShadow`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShadow {
    pub inset: bool,
    pub h: f64,
    pub v: f64,
    pub blur: f64,
    pub color: Color,
}

impl BoxShadow {
    /// The RTL postprocessor: negate the horizontal offset.
    pub fn mirrored(self) -> Self {
        Self { h: -self.h, ..self }
    }
}

/// The resolved form of `textShadow`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    pub color: Color,
    pub radius: f64,
    pub opacity: f64,
    pub h: f64,
    pub v: f64,
}

/// The untyped value carried through the pipeline before and after
/// preprocessing. `Raw` variants are what a binding sets; the `Resolved`
/// variants are what preprocessors emit.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Color(Color),
    BorderRadius(BorderRadius),
    Border(Border),
    Gradient(Gradient),
    BoxShadow(BoxShadow),
    TextShadow(TextShadow),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(d) => Some(*d),
            AttributeValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// The output of a handler's preprocess chain — distinct type alias so call
/// sites read the same way `Result<PreprocessedValue>` does in the original.
pub type PreprocessedValue = AttributeValue;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_angle_snaps_to_nearest_eighth() {
        assert_eq!(GradientAngle::snap_degrees(0.0), GradientAngle::Top);
        assert_eq!(GradientAngle::snap_degrees(44.0), GradientAngle::TopRight);
        assert_eq!(GradientAngle::snap_degrees(91.0), GradientAngle::Right);
        assert_eq!(GradientAngle::snap_degrees(359.0), GradientAngle::Top);
    }

    #[test]
    fn gradient_angle_mirrors_horizontally() {
        assert_eq!(GradientAngle::TopRight.mirrored(), GradientAngle::TopLeft);
        assert_eq!(GradientAngle::Top.mirrored(), GradientAngle::Top);
    }

    #[test]
    fn box_shadow_mirror_negates_horizontal_offset_only() {
        let shadow = BoxShadow { inset: false, h: 4.0, v: 2.0, blur: 1.0, color: Color::BLACK };
        assert_eq!(shadow.mirrored().h, -4.0);
        assert_eq!(shadow.mirrored().v, 2.0);
    }
}
