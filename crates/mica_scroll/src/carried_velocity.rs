//! Momentum carried from one fling into the next drag.
//!
//! Android just remembers the fling's ending velocity and resets an axis the
//! moment a new drag reverses its sign. iOS additionally folds the velocity
//! through a non-linear curve and adds timing/magnitude thresholds before a
//! new fling is allowed to inherit it.

use mica_core::{Duration, Vector};

fn reset_axis_on_direction_change(carried: f64, incoming: f64) -> f64 {
    if carried.is_sign_negative() != incoming.is_sign_negative() {
        0.0
    } else {
        carried
    }
}

/// Android: the raw post-deceleration velocity, reset per-axis on reversal.
#[derive(Clone, Copy, Debug, Default)]
pub struct AndroidCarriedVelocity {
    velocity: Vector,
}

impl AndroidCarriedVelocity {
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn on_drag(&mut self, incoming_velocity: Vector) {
        self.velocity.dx = reset_axis_on_direction_change(self.velocity.dx, incoming_velocity.dx);
        self.velocity.dy = reset_axis_on_direction_change(self.velocity.dy, incoming_velocity.dy);
    }

    pub fn update(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub fn reset(&mut self) {
        self.velocity = Vector::ZERO;
    }
}

const END_VELOCITY_THRESHOLD: f64 = 0.2;
const DRAG_TIMEOUT: Duration = Duration::from_millis(250);
const FOLD_SCALE: f64 = 0.000_816;
const FOLD_EXPONENT: f64 = 1.967;
const FOLD_CAP: f64 = 80_000.0;

/// `sign(v) * min(0.000816 * |v|^1.967, 80000)`.
fn fold(velocity: f64) -> f64 {
    let sign = if velocity.is_sign_negative() { -1.0 } else { 1.0 };
    let scaled = FOLD_SCALE * velocity.abs().powf(FOLD_EXPONENT);
    sign * scaled.min(FOLD_CAP)
}

/// iOS: the folded velocity, gated by drag direction/magnitude/duration.
#[derive(Clone, Copy, Debug, Default)]
pub struct IosCarriedVelocity {
    velocity: Vector,
    drag_start_time: Duration,
}

impl IosCarriedVelocity {
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn reset(&mut self) {
        self.velocity = Vector::ZERO;
    }

    /// Fold a fresh fling velocity into the carried component.
    pub fn update(&mut self, velocity: Vector) {
        self.velocity = Vector::new(fold(velocity.dx), fold(velocity.dy));
    }

    /// Cancel per-axis carried velocity that now points the wrong way, then
    /// remember when this drag began.
    pub fn on_drag_began(&mut self, incoming_velocity: Vector, now: Duration) {
        self.velocity.dx = reset_axis_on_direction_change(self.velocity.dx, incoming_velocity.dx);
        self.velocity.dy = reset_axis_on_direction_change(self.velocity.dy, incoming_velocity.dy);
        self.drag_start_time = now;
    }

    /// On drag end: cancel an axis whose fling velocity fell under 20% of
    /// what's carried, and cancel everything if the drag ran past 250ms.
    pub fn on_drag_ended(&mut self, fling_velocity: Vector, now: Duration) {
        if fling_velocity.dx.abs() < self.velocity.dx.abs() * END_VELOCITY_THRESHOLD {
            self.velocity.dx = 0.0;
        }
        if fling_velocity.dy.abs() < self.velocity.dy.abs() * END_VELOCITY_THRESHOLD {
            self.velocity.dy = 0.0;
        }
        if now - self.drag_start_time > DRAG_TIMEOUT {
            self.velocity = Vector::ZERO;
        }
    }
}
