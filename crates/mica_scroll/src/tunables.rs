//! Externally configurable constants for the Android spline table.
//!
//! Mirrors Android's `OverScroller` defaults. Call [`initialize`] once,
//! before any [`crate::spline::SplinePhysics`] is constructed, to override
//! them; afterwards the values are frozen for the process lifetime.

use std::sync::OnceLock;

const DEFAULT_GRAVITY: f64 = 2000.0;
const DEFAULT_INFLEXION: f64 = 0.35;
const DEFAULT_START_TENSION: f64 = 0.5;
const DEFAULT_END_TENSION: f64 = 1.0;
const DEFAULT_PHYSICAL_COEF: f64 = 9.806_65 * 39.37 * 160.0 * 0.84;
const DEFAULT_DECELERATION_RATE: f64 = 2.358_201_7;

#[derive(Clone, Copy, Debug)]
pub struct Tunables {
    pub gravity: f64,
    pub inflexion: f64,
    pub start_tension: f64,
    pub end_tension: f64,
    pub physical_coef: f64,
    pub deceleration_rate: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            inflexion: DEFAULT_INFLEXION,
            start_tension: DEFAULT_START_TENSION,
            end_tension: DEFAULT_END_TENSION,
            physical_coef: DEFAULT_PHYSICAL_COEF,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
        }
    }
}

static TUNABLES: OnceLock<Tunables> = OnceLock::new();

/// Override the spline tunables. A `None` component keeps its default. Only
/// the first call (whether explicit or implicit via [`get`]) takes effect.
pub fn initialize(
    gravity: Option<f64>,
    inflexion: Option<f64>,
    start_tension: Option<f64>,
    end_tension: Option<f64>,
    physical_coef: Option<f64>,
    deceleration_rate: Option<f64>,
) {
    let defaults = Tunables::default();
    let _ = TUNABLES.set(Tunables {
        gravity: gravity.unwrap_or(defaults.gravity),
        inflexion: inflexion.unwrap_or(defaults.inflexion),
        start_tension: start_tension.unwrap_or(defaults.start_tension),
        end_tension: end_tension.unwrap_or(defaults.end_tension),
        physical_coef: physical_coef.unwrap_or(defaults.physical_coef),
        deceleration_rate: deceleration_rate.unwrap_or(defaults.deceleration_rate),
    });
}

pub fn get() -> Tunables {
    *TUNABLES.get_or_init(Tunables::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_android_overscroller() {
        let t = Tunables::default();
        assert_eq!(t.gravity, 2000.0);
        assert_eq!(t.inflexion, 0.35);
        assert!((t.physical_coef - 9.806_65 * 39.37 * 160.0 * 0.84).abs() < 1e-9);
    }
}
