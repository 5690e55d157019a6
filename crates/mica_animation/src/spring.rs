//! Closed-form critically/under/over-damped spring integration.
//!
//! Shared by the property `SpringAnimation` (single-value springs) and by
//! `mica_scroll`'s bounce physics. A `Copy`-friendly struct with a
//! `update_values`/`is_at_equilibrium` pair, in the same shape as a
//! hand-rolled RK4 spring, but integrated analytically so a single call
//! advances by an arbitrary `dt` without accumulating numerical error over
//! many small ticks.

/// `(stiffness, damping, mass)` plus the minimum perceptible change used to
/// decide equilibrium.
#[derive(Clone, Copy, Debug)]
pub struct SpringForce {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub min_visible_change: f64,
    final_position: f64,
}

impl SpringForce {
    pub fn new(stiffness: f64, damping: f64, min_visible_change: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
            min_visible_change,
            final_position: 0.0,
        }
    }

    pub fn final_position(&self) -> f64 {
        self.final_position
    }

    pub fn set_final_position(&mut self, position: f64) {
        self.final_position = position;
    }

    fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.mass * self.stiffness).sqrt())
    }

    /// Advance `(value, velocity)` by `delta_millis`, relative to
    /// `final_position`, using the closed-form solution for the current
    /// damping regime (under/critically/over-damped).
    pub fn update_values(&self, value: f64, velocity: f64, delta_millis: f64) -> (f64, f64) {
        let t = delta_millis / 1000.0;
        let displacement = value - self.final_position;
        let zeta = self.damping_ratio();
        let omega0 = self.natural_frequency();

        let (new_displacement, new_velocity) = if zeta < 1.0 {
            let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
            let beta = self.damping / (2.0 * self.mass);
            let spring_reference = (velocity + beta * displacement) / omega_d;
            let envelope = (-beta * t).exp();
            let cos = (omega_d * t).cos();
            let sin = (omega_d * t).sin();
            let x = envelope * (displacement * cos + spring_reference * sin);
            let v = envelope
                * ((spring_reference * omega_d - displacement * beta) * cos
                    - (displacement * omega_d + spring_reference * beta) * sin);
            (x, v)
        } else if (zeta - 1.0).abs() < 1e-9 {
            let beta = omega0;
            let envelope = (-beta * t).exp();
            let x = envelope * (displacement + (velocity + beta * displacement) * t);
            let v = envelope * (velocity - beta * t * (velocity + beta * displacement));
            (x, v)
        } else {
            let beta = self.damping / (2.0 * self.mass);
            let discriminant = (beta * beta - omega0 * omega0).sqrt();
            let r1 = -beta + discriminant;
            let r2 = -beta - discriminant;
            let c2 = (velocity - r1 * displacement) / (r2 - r1);
            let c1 = displacement - c2;
            let x = c1 * (r1 * t).exp() + c2 * (r2 * t).exp();
            let v = c1 * r1 * (r1 * t).exp() + c2 * r2 * (r2 * t).exp();
            (x, v)
        };

        (self.final_position + new_displacement, new_velocity)
    }

    /// `|value − target| < minVisibleChange ∧ |velocity| < threshold`.
    pub fn is_at_equilibrium(&self, value: f64, velocity: f64) -> bool {
        let velocity_threshold = self.min_visible_change * 62.5;
        (value - self.final_position).abs() < self.min_visible_change && velocity.abs() < velocity_threshold
    }
}
