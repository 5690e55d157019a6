//! The spring that brings an overscrolled content offset back to its
//! clamped boundary. Distinct from [`mica_animation::SpringForce`]: this one
//! operates on a raw, always-underdamped `(displacement, velocity)` vector
//! rather than a scalar value with a mutable target, and clamps its seed
//! velocity into a fixed overscroll range.

use mica_core::{Duration, Vector};

pub const MIN_OVERSCROLL_VELOCITY: f64 = 15.0;
pub const MAX_OVERSCROLL_VELOCITY: f64 = 3500.0;

const THRESHOLD: f64 = 0.5;
const VELOCITY_COMPUTATION_DURATION_SECS: f64 = 0.01;

/// `(naturalFrequency, damping, beta)` derived once from `(mass, stiffness,
/// dampingRatio)` — the Android and iOS bounce springs each use a fixed one.
#[derive(Clone, Copy, Debug)]
pub struct SpringBounceConfig {
    natural_frequency: f64,
    beta: f64,
}

impl SpringBounceConfig {
    pub fn make(mass: f64, stiffness: f64, damping_ratio: f64) -> Self {
        let natural_frequency = (stiffness / mass).sqrt() * (1.0 - damping_ratio.powi(2)).sqrt();
        let damping = 2.0 * damping_ratio * (mass * stiffness).sqrt();
        let beta = damping / (2.0 * mass);
        Self {
            natural_frequency,
            beta,
        }
    }

    /// Android's bounce spring: mass 0.35, stiffness 120, damping ratio 0.95.
    pub fn android() -> Self {
        Self::make(0.35, 120.0, 0.95)
    }

    /// iOS's bounce spring: mass 0.5, stiffness 95, damping ratio 0.95.
    pub fn ios() -> Self {
        Self::make(0.5, 95.0, 0.95)
    }
}

fn clamped_velocity(velocity: f64, displacement: f64) -> f64 {
    if velocity == 0.0 && displacement == 0.0 {
        return 0.0;
    }
    let sign = if velocity.is_sign_negative() { -1.0 } else { 1.0 };
    sign * velocity.abs().clamp(MIN_OVERSCROLL_VELOCITY, MAX_OVERSCROLL_VELOCITY)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SpringBounceResult {
    pub distance: Vector,
    pub velocity: Vector,
    pub finished: bool,
}

pub struct SpringBouncePhysics {
    config: SpringBounceConfig,
    velocity: Vector,
    displacement: Vector,
    spring_reference: Vector,
    duration: Duration,
}

impl SpringBouncePhysics {
    pub fn new(config: SpringBounceConfig, velocity: Vector, displacement: Vector) -> Self {
        let velocity = Vector::new(
            clamped_velocity(velocity.dx, displacement.dx),
            clamped_velocity(velocity.dy, displacement.dy),
        );
        let spring_reference = Vector::new(
            (velocity.dx + config.beta * displacement.dx) / config.natural_frequency,
            (velocity.dy + config.beta * displacement.dy) / config.natural_frequency,
        );

        let displacement_length = (displacement.dx * displacement.dx + displacement.dy * displacement.dy).sqrt();
        let velocity_length = (velocity.dx * velocity.dx + velocity.dy * velocity.dy).sqrt();

        let duration = if displacement_length != 0.0 || velocity_length != 0.0 {
            let reference_length =
                (spring_reference.dx * spring_reference.dx + spring_reference.dy * spring_reference.dy).sqrt();
            Duration::from_secs_f64(((displacement_length + reference_length) / THRESHOLD).ln() / config.beta)
        } else {
            Duration::ZERO
        };

        Self {
            config,
            velocity,
            displacement,
            spring_reference,
            duration,
        }
    }

    fn distance_at(&self, elapsed: Duration) -> Vector {
        let time = elapsed.as_secs_f64();
        let wd = self.config.natural_frequency * time;
        let envelope = (-self.config.beta * time).exp();
        let cos = wd.cos();
        let sin = wd.sin();
        Vector::new(
            envelope * (self.displacement.dx * cos + self.spring_reference.dx * sin),
            envelope * (self.displacement.dy * cos + self.spring_reference.dy * sin),
        )
    }

    pub fn compute(&self, elapsed: Duration) -> SpringBounceResult {
        if elapsed >= self.duration {
            return SpringBounceResult {
                finished: true,
                ..Default::default()
            };
        }

        let distance = self.distance_at(elapsed);
        let velocity_computation = Duration::from_secs_f64(VELOCITY_COMPUTATION_DURATION_SECS);
        let velocity = if elapsed > velocity_computation {
            let last = self.distance_at(elapsed - velocity_computation);
            Vector::new(
                (distance.dx - last.dx) / VELOCITY_COMPUTATION_DURATION_SECS,
                (distance.dy - last.dy) / VELOCITY_COMPUTATION_DURATION_SECS,
            )
        } else {
            self.velocity
        };

        SpringBounceResult {
            distance,
            velocity,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_displacement_zero_velocity_finishes_immediately() {
        let physics = SpringBouncePhysics::new(SpringBounceConfig::android(), Vector::ZERO, Vector::ZERO);
        assert!(physics.compute(Duration::ZERO).finished);
    }

    #[test]
    fn overscrolled_displacement_decays_towards_zero() {
        let physics = SpringBouncePhysics::new(SpringBounceConfig::android(), Vector::ZERO, Vector::new(100.0, 0.0));
        let early = physics.compute(Duration::from_millis(16)).distance.dx;
        let late = physics.compute(Duration::from_millis(400)).distance.dx;
        assert!(early.abs() < 100.0);
        assert!(late.abs() < early.abs());
    }

    #[test]
    fn velocity_is_clamped_into_overscroll_range() {
        let physics = SpringBouncePhysics::new(SpringBounceConfig::android(), Vector::new(50000.0, 0.0), Vector::new(10.0, 0.0));
        assert!(physics.velocity.dx <= MAX_OVERSCROLL_VELOCITY);
    }
}
