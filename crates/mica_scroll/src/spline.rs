//! Android's `OverScroller` spline deceleration, ported sample-for-sample.
//!
//! The spline has no closed form; Android (and this crate) precomputes 101
//! samples of two parametric Bezier-like curves via nested bisection, then
//! interpolates linearly between adjacent samples at runtime.

use std::sync::OnceLock;

use mica_core::{Duration, Vector};

use crate::tunables::{self, Tunables};

const SAMPLE_COUNT: usize = 100;

struct SplineTable {
    position: [f64; SAMPLE_COUNT + 1],
    time: [f64; SAMPLE_COUNT + 1],
}

impl SplineTable {
    fn build(t: Tunables) -> Self {
        let p1 = t.start_tension * t.inflexion;
        let p2 = 1.0 - t.end_tension * (1.0 - t.inflexion);

        let mut position = [0.0; SAMPLE_COUNT + 1];
        let mut time = [0.0; SAMPLE_COUNT + 1];

        // Lower bisection bounds intentionally persist across samples: both
        // curves are monotonic in the sample index, so each sample's search
        // can start where the previous one left off.
        let mut x_min = 0.0f64;
        let mut y_min = 0.0f64;

        for i in 0..SAMPLE_COUNT {
            let alpha = i as f64 / SAMPLE_COUNT as f64;

            let mut x_max = 1.0f64;
            let mut x = 0.0f64;
            let mut coef = 0.0f64;
            loop {
                x = x_min + (x_max - x_min) / 2.0;
                coef = 3.0 * x * (1.0 - x);
                let tx = coef * ((1.0 - x) * p1 + x * p2) + x * x * x;
                if (tx - alpha).abs() < 1e-5 {
                    break;
                }
                if tx > alpha {
                    x_max = x;
                } else {
                    x_min = x;
                }
            }
            position[i] = coef * ((1.0 - x) * t.start_tension + x) + x * x * x;

            let mut y_max = 1.0f64;
            let mut y = 0.0f64;
            let mut coef_y = 0.0f64;
            loop {
                y = y_min + (y_max - y_min) / 2.0;
                coef_y = 3.0 * y * (1.0 - y);
                let dy = coef_y * ((1.0 - y) * t.start_tension + y) + y * y * y;
                if (dy - alpha).abs() < 1e-5 {
                    break;
                }
                if dy > alpha {
                    y_max = y;
                } else {
                    y_min = y;
                }
            }
            time[i] = coef_y * ((1.0 - y) * p1 + y * p2) + y * y * y;
        }

        position[SAMPLE_COUNT] = 1.0;
        time[SAMPLE_COUNT] = 1.0;

        Self { position, time }
    }
}

static TABLE: OnceLock<SplineTable> = OnceLock::new();

fn table() -> &'static SplineTable {
    TABLE.get_or_init(|| SplineTable::build(tunables::get()))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SplineResult {
    pub distance: Vector,
    pub velocity: Vector,
    pub finished: bool,
}

/// Per-axis fling physics for a single gesture, seeded from a velocity.
pub struct SplinePhysics {
    distance: Vector,
    duration_x: Duration,
    duration_y: Duration,
}

fn deceleration(friction: f64, velocity: f64, t: Tunables) -> f64 {
    (t.inflexion * velocity.abs() / (friction * t.physical_coef)).ln()
}

fn distance_for(friction: f64, velocity: f64, decel: f64, t: Tunables) -> f64 {
    let decel_minus_one = t.deceleration_rate - 1.0;
    let abs_distance = friction * t.physical_coef * (t.deceleration_rate / decel_minus_one * decel).exp();
    if velocity.is_sign_negative() {
        -abs_distance
    } else {
        abs_distance
    }
}

fn duration_for(decel: f64, t: Tunables) -> Duration {
    let decel_minus_one = t.deceleration_rate - 1.0;
    Duration::from_secs_f64((decel / decel_minus_one).exp())
}

impl SplinePhysics {
    pub fn new(scroll_friction: f64, velocity: Vector) -> Self {
        let t = tunables::get();
        let mut distance = Vector::ZERO;
        let mut duration_x = Duration::ZERO;
        let mut duration_y = Duration::ZERO;

        if velocity.dx != 0.0 {
            let decel = deceleration(scroll_friction, velocity.dx, t);
            distance.dx = distance_for(scroll_friction, velocity.dx, decel, t);
            duration_x = duration_for(decel, t);
        }
        if velocity.dy != 0.0 {
            let decel = deceleration(scroll_friction, velocity.dy, t);
            distance.dy = distance_for(scroll_friction, velocity.dy, decel, t);
            duration_y = duration_for(decel, t);
        }

        Self {
            distance,
            duration_x,
            duration_y,
        }
    }

    pub fn compute(&self, elapsed: Duration) -> SplineResult {
        let (dx, vx, finished_x) = Self::axis(self.duration_x, self.distance.dx, elapsed);
        let (dy, vy, finished_y) = Self::axis(self.duration_y, self.distance.dy, elapsed);
        SplineResult {
            distance: Vector::new(dx, dy),
            velocity: Vector::new(vx, vy),
            finished: finished_x && finished_y,
        }
    }

    fn axis(total_duration: Duration, total_distance: f64, elapsed: Duration) -> (f64, f64, bool) {
        if elapsed >= total_duration {
            return (total_distance, 0.0, true);
        }

        let samples = table();
        let ratio = elapsed.as_secs_f64() / total_duration.as_secs_f64();
        let index = (SAMPLE_COUNT as f64 * ratio) as usize;

        let (distance_coef, velocity_coef) = if index < SAMPLE_COUNT {
            let t_inf = index as f64 / SAMPLE_COUNT as f64;
            let t_sup = (index + 1) as f64 / SAMPLE_COUNT as f64;
            let d_inf = samples.position[index];
            let d_sup = samples.position[index + 1];
            let velocity_coef = (d_sup - d_inf) / (t_sup - t_inf);
            let distance_coef = d_inf + (ratio - t_inf) * velocity_coef;
            (distance_coef, velocity_coef)
        } else {
            (1.0, 0.0)
        };

        let distance = distance_coef * total_distance;
        let velocity = velocity_coef * total_distance / total_duration.as_secs_f64();
        (distance, velocity, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_velocity_axis_finishes_immediately() {
        let physics = SplinePhysics::new(1.0, Vector::ZERO);
        let result = physics.compute(Duration::ZERO);
        assert!(result.finished);
        assert_eq!(result.distance, Vector::ZERO);
    }

    #[test]
    fn fling_reaches_total_distance_at_full_duration() {
        let physics = SplinePhysics::new(1.0, Vector::new(4000.0, 0.0));
        let result = physics.compute(Duration::MAX);
        assert!(result.finished);
        assert!(result.distance.dx > 0.0);
        assert_eq!(result.velocity.dx, 0.0);
    }

    #[test]
    fn velocity_sign_matches_distance_sign() {
        let physics = SplinePhysics::new(1.0, Vector::new(-4000.0, 0.0));
        let result = physics.compute(Duration::MAX);
        assert!(result.distance.dx < 0.0);
    }

    #[test]
    fn mid_flight_distance_is_between_zero_and_total() {
        let physics = SplinePhysics::new(1.0, Vector::new(4000.0, 0.0));
        let total = physics.compute(Duration::MAX).distance.dx;
        let half_duration = Duration::from_millis((physics.duration_x.as_millis()) / 2);
        let mid = physics.compute(half_duration).distance.dx;
        assert!(mid > 0.0 && mid < total);
    }
}
