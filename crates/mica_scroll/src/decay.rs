//! iOS-style exponential decay scroll physics: a closed form, unlike
//! Android's sampled spline, so every quantity (position, velocity,
//! duration, and its inverse) is a plain formula.

use mica_core::{Duration, Point, Vector};

const NORMAL_RATE: f64 = 0.998;
const FAST_RATE: f64 = 0.99;
const THRESHOLD: f64 = 0.5;

fn rate(fast: bool) -> f64 {
    if fast {
        FAST_RATE
    } else {
        NORMAL_RATE
    }
}

/// `1000 * ln(rate)` — always negative since `rate < 1`.
fn coef(fast: bool) -> f64 {
    1000.0 * rate(fast).ln()
}

/// `x(t) = x0 + ((rate^t - 1) / coef) * v0`.
pub fn position(x0: f64, v0: f64, elapsed: Duration, fast: bool) -> f64 {
    let c = coef(fast);
    let ratio = (rate(fast).powf(elapsed.as_millis() as f64) - 1.0) / c;
    x0 + ratio * v0
}

pub fn position_vector(offset: Point, velocity: Vector, elapsed: Duration, fast: bool) -> Point {
    Point::new(
        position(offset.x, velocity.dx, elapsed, fast),
        position(offset.y, velocity.dy, elapsed, fast),
    )
}

/// `v(t) = v0 * rate^t`.
pub fn velocity(v0: f64, elapsed: Duration, fast: bool) -> f64 {
    v0 * rate(fast).powf(elapsed.as_millis() as f64)
}

pub fn velocity_vector(v0: Vector, elapsed: Duration, fast: bool) -> Vector {
    Vector::new(velocity(v0.dx, elapsed, fast), velocity(v0.dy, elapsed, fast))
}

/// `t* = ln(-coef * threshold / |v|) / coef`, zero for a zero velocity.
pub fn duration(velocity: Vector, fast: bool) -> Duration {
    let length = (velocity.dx * velocity.dx + velocity.dy * velocity.dy).sqrt();
    if length == 0.0 {
        return Duration::ZERO;
    }
    let c = coef(fast);
    Duration::from_secs_f64((-c * THRESHOLD / length).ln() / c)
}

/// Time to reach `target_offset` travelling at `velocity` from `source_offset`,
/// or `None` if the velocity doesn't carry towards the target on that axis.
fn time_to_target_axis(source: f64, velocity: f64, target: f64, fast: bool) -> Option<Duration> {
    let distance = target - source;
    if velocity == 0.0 || distance.is_sign_negative() != velocity.is_sign_negative() {
        return None;
    }
    let c = coef(fast);
    let base = (distance / velocity * c) + 1.0;
    let time_ms = base.ln() / rate(fast).ln();
    Some(Duration::from_secs_f64(time_ms / 1000.0))
}

/// Vector form: the sooner of the two axes' arrival times, or whichever
/// axis is actually moving towards the target.
pub fn time_to_target(source: Point, velocity: Vector, target: Point, fast: bool) -> Option<Duration> {
    let x = time_to_target_axis(source.x, velocity.dx, target.x, fast);
    let y = time_to_target_axis(source.y, velocity.dy, target.y, fast);
    match (x, y) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

/// The single-step estimate used for paging: where the content would land
/// if decelerating instantaneously from `velocity`, ignoring the elapsed-time
/// curve entirely.
pub fn final_offset(content_offset: Point, velocity: Vector, fast: bool) -> Point {
    let c = coef(fast);
    Point::new(content_offset.x + velocity.dx / -c, content_offset.y + velocity.dy / -c)
}

/// The initial velocity that would carry `initial_offset` to `final_offset`
/// under this decay model — used to seed a programmatic content-offset
/// animation with a velocity-shaped curve.
pub fn initial_velocity_for_offsets(initial_offset: Point, final_offset: Point, fast: bool) -> Vector {
    let c = coef(fast);
    Vector::new(
        (final_offset.x - initial_offset.x) * -c,
        (final_offset.y - initial_offset.y) * -c,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_at_zero_elapsed_is_source() {
        assert_eq!(position(100.0, 500.0, Duration::ZERO, false), 100.0);
    }

    #[test]
    fn velocity_decays_towards_zero() {
        let v = velocity(1000.0, Duration::from_millis(500), false);
        assert!(v > 0.0 && v < 1000.0);
    }

    #[test]
    fn zero_velocity_has_zero_duration() {
        assert_eq!(duration(Vector::ZERO, false), Duration::ZERO);
    }

    #[test]
    fn time_to_target_none_when_velocity_points_away() {
        let result = time_to_target_axis(0.0, -100.0, 50.0, false);
        assert!(result.is_none());
    }

    #[test]
    fn time_to_target_some_when_velocity_points_towards() {
        let result = time_to_target_axis(0.0, 500.0, 50.0, false);
        assert!(result.is_some());
    }

    #[test]
    fn final_offset_moves_in_velocity_direction() {
        let offset = final_offset(Point::ZERO, Vector::new(1000.0, 0.0), false);
        assert!(offset.x > 0.0);
    }
}
