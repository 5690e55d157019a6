//! 2D geometry primitives and a millisecond-precision duration type.
//!
//! These are the value types the rest of the workspace is built on: the
//! layer tree, the animation primitives, and the scroll physics all operate
//! in terms of `Point`/`Size`/`Frame` and advance `Duration`s per tick.

use std::ops::{Add, Rem, Sub};

/// A signed time quantity with millisecond precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    millis: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration { millis: 0 };
    pub const MAX: Duration = Duration { millis: i64::MAX };

    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Self {
            millis: (secs * 1000.0).round() as i64,
        }
    }

    pub const fn as_millis(self) -> i64 {
        self.millis
    }

    pub fn as_secs_f64(self) -> f64 {
        self.millis as f64 / 1000.0
    }

    pub fn is_zero(self) -> bool {
        self.millis == 0
    }

    /// Clamp to zero or greater; used when subtracting elapsed time from a
    /// remaining duration (spec.md §3, time animation).
    pub fn max_zero(self) -> Self {
        Self {
            millis: self.millis.max(0),
        }
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_millis(self.millis.saturating_add(rhs.millis))
    }
}

impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_millis(self.millis.saturating_sub(rhs.millis))
    }
}

impl Rem for Duration {
    type Output = Duration;
    fn rem(self, rhs: Duration) -> Duration {
        if rhs.millis == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.millis % rhs.millis)
    }
}

/// 2D point in device-independent pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// 2D size in device-independent pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Shortest side, used to resolve percent-based border radii.
    pub fn shortest_side(self) -> f64 {
        self.width.min(self.height)
    }
}

/// A free 2D vector (translation, velocity, etc). Distinct type from `Point`
/// so a translation and a position aren't accidentally interchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// `(x, y, width, height)` — the geometry of a layer or view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const ZERO: Frame = Frame {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(self) -> f64 {
        self.x
    }
    pub fn min_y(self) -> f64 {
        self.y
    }
    pub fn max_x(self) -> f64 {
        self.x + self.width
    }
    pub fn max_y(self) -> f64 {
        self.y + self.height
    }

    /// Total function: always returns a `Frame`, empty if disjoint.
    pub fn intersection(self, other: Frame) -> Frame {
        let x0 = self.min_x().max(other.min_x());
        let y0 = self.min_y().max(other.min_y());
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        if x1 <= x0 || y1 <= y0 {
            Frame::ZERO
        } else {
            Frame::new(x0, y0, x1 - x0, y1 - y0)
        }
    }

    pub fn intersects(self, other: Frame) -> bool {
        let i = self.intersection(other);
        i.width > 0.0 && i.height > 0.0
    }

    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.max_x()
            && point.y >= self.y
            && point.y <= self.max_y()
    }

    pub fn with_offset(self, dx: f64, dy: f64) -> Frame {
        Frame::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_arithmetic() {
        let a = Duration::from_millis(500);
        let b = Duration::from_millis(200);
        assert_eq!((a - b).as_millis(), 300);
        assert_eq!((a + b).as_millis(), 700);
        assert_eq!((a % b).as_millis(), 100);
    }

    #[test]
    fn duration_max_zero_clamps() {
        let a = Duration::from_millis(100);
        let b = Duration::from_millis(300);
        assert_eq!((a - b).max_zero().as_millis(), 0);
    }

    #[test]
    fn frame_intersection_is_total() {
        let a = Frame::new(0.0, 0.0, 10.0, 10.0);
        let b = Frame::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.intersection(b), Frame::ZERO);
        assert!(!a.intersects(b));

        let c = Frame::new(5.0, 5.0, 10.0, 10.0);
        let i = a.intersection(c);
        assert_eq!(i, Frame::new(5.0, 5.0, 5.0, 5.0));
        assert!(a.intersects(c));
    }

    #[test]
    fn frame_contains_boundary_inclusive() {
        let f = Frame::new(0.0, 0.0, 10.0, 10.0);
        assert!(f.contains(Point::new(10.0, 10.0)));
        assert!(f.contains(Point::new(0.0, 0.0)));
        assert!(!f.contains(Point::new(10.01, 5.0)));
    }

    #[test]
    fn frame_with_offset() {
        let f = Frame::new(1.0, 2.0, 10.0, 10.0);
        let moved = f.with_offset(-1.0, -2.0);
        assert_eq!(moved, Frame::new(0.0, 0.0, 10.0, 10.0));
    }
}
