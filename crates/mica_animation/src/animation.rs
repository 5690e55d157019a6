//! The two built-in `Animation` implementations: time-based and
//! spring-based. Both satisfy `mica_core::layer::Animation`'s
//! `run/cancel/complete/addCompletion` contract so a `Layer` can hold
//! either (or `mica_scroll`'s fling/bounce variants) in the same map.

use std::sync::Arc;

use mica_core::{Animation as AnimationTrait, Duration, LayerHandle, TickResult};

use crate::easing::Interpolator;
use crate::spring::SpringForce;

type Applier = Box<dyn FnMut(&LayerHandle, f64) + Send>;
type Completion = Box<dyn FnOnce(bool) + Send>;

fn run_completions(completions: Vec<Completion>, did_complete: bool) {
    for completion in completions {
        completion(did_complete);
    }
}

/// A duration-driven animation interpolating `[0,1]` through a timing
/// curve. First tick always applies ratio 0 without consuming `delta`.
pub struct TimeAnimation {
    duration: Duration,
    remaining: Duration,
    interpolation: Arc<dyn Interpolator>,
    applier: Option<Applier>,
    completions: Vec<Completion>,
    started: bool,
}

impl TimeAnimation {
    pub fn new(duration: Duration, interpolation: Arc<dyn Interpolator>, applier: Applier) -> Self {
        Self {
            duration,
            remaining: duration,
            interpolation,
            applier: Some(applier),
            completions: Vec::new(),
            started: false,
        }
    }

    fn finish(&mut self, layer: &LayerHandle, did_complete: bool) {
        if let Some(mut applier) = self.applier.take() {
            applier(layer, 1.0);
        }
        run_completions(std::mem::take(&mut self.completions), did_complete);
    }
}

impl AnimationTrait for TimeAnimation {
    fn run(&mut self, layer: &LayerHandle, delta: Duration) -> TickResult {
        let Some(applier) = self.applier.as_mut() else {
            return TickResult::Done;
        };

        if !self.started {
            applier(layer, 0.0);
            self.started = true;
            return TickResult::NotDone;
        }

        self.remaining = (self.remaining - delta).max_zero();

        if self.remaining.is_zero() {
            tracing::trace!(duration_ms = self.duration.as_millis(), "time animation completed");
            TickResult::Done
        } else {
            let elapsed_ratio = 1.0 - (self.remaining.as_millis() as f64 / self.duration.as_millis() as f64);
            let ratio = self.interpolation.ease(elapsed_ratio);
            applier(layer, ratio);
            TickResult::NotDone
        }
    }

    fn cancel(&mut self, layer: &LayerHandle) {
        self.finish(layer, false);
    }

    fn complete(&mut self, layer: &LayerHandle) {
        self.finish(layer, true);
    }

    fn add_completion(&mut self, callback: Completion) {
        self.completions.push(callback);
    }
}

/// A spring-driven animation over a normalized `[0,1]`-ish value space; the
/// applier closure maps the ratio to whatever property it actually drives.
pub struct SpringAnimation {
    spring: SpringForce,
    value: f64,
    velocity: f64,
    pending_target: Option<f64>,
    end_requested: bool,
    applier: Option<Applier>,
    completions: Vec<Completion>,
    started: bool,
}

impl SpringAnimation {
    pub fn new(stiffness: f64, damping: f64, min_visible_change: f64, applier: Applier) -> Self {
        Self {
            spring: SpringForce::new(stiffness, damping, min_visible_change),
            value: 0.0,
            velocity: 0.0,
            pending_target: None,
            end_requested: false,
            applier: Some(applier),
            completions: Vec::new(),
            started: false,
        }
    }

    /// Push a new target mid-flight; the next tick runs half the delta at
    /// the old target and half at the new one (spec step 2 of §4.4).
    pub fn set_target(&mut self, target: f64) {
        self.pending_target = Some(target);
    }

    /// Request the spring snap to its final position on the next tick.
    pub fn request_end(&mut self) {
        self.end_requested = true;
    }

    fn finish(&mut self, layer: &LayerHandle, did_complete: bool) {
        if let Some(mut applier) = self.applier.take() {
            applier(layer, self.value);
        }
        run_completions(std::mem::take(&mut self.completions), did_complete);
    }
}

impl AnimationTrait for SpringAnimation {
    fn run(&mut self, layer: &LayerHandle, delta: Duration) -> TickResult {
        let Some(applier) = self.applier.as_mut() else {
            return TickResult::Done;
        };

        if !self.started {
            applier(layer, 0.0);
            self.started = true;
            return TickResult::NotDone;
        }

        if self.end_requested {
            if let Some(target) = self.pending_target.take() {
                self.spring.set_final_position(target);
            }
            self.value = self.spring.final_position();
            self.velocity = 0.0;
            self.end_requested = false;
            return TickResult::Done;
        }

        let delta_millis = delta.as_millis() as f64;
        if let Some(target) = self.pending_target.take() {
            let (value, velocity) = self.spring.update_values(self.value, self.velocity, delta_millis / 2.0);
            self.spring.set_final_position(target);
            let (value, velocity) = self.spring.update_values(value, velocity, delta_millis / 2.0);
            self.value = value;
            self.velocity = velocity;
        } else {
            let (value, velocity) = self.spring.update_values(self.value, self.velocity, delta_millis);
            self.value = value;
            self.velocity = velocity;
        }

        // Clamp into the positive f64 range — a literal carry-over of the
        // upstream engine's `[FLT_MIN, FLT_MAX]` clamp.
        self.value = self.value.clamp(f64::MIN_POSITIVE, f64::MAX);

        if self.spring.is_at_equilibrium(self.value, self.velocity) {
            self.value = self.spring.final_position();
            self.velocity = 0.0;
            tracing::trace!(value = self.value, "spring animation settled");
            return TickResult::Done;
        }

        applier(layer, self.value);
        TickResult::NotDone
    }

    fn cancel(&mut self, layer: &LayerHandle) {
        self.finish(layer, false);
    }

    fn complete(&mut self, layer: &LayerHandle) {
        self.finish(layer, true);
    }

    fn add_completion(&mut self, callback: Completion) {
        self.completions.push(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Linear;
    use mica_core::Layer;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc as StdArc;

    fn layer_handle() -> LayerHandle {
        LayerHandle::new(Layer::default())
    }

    #[test]
    fn time_animation_first_tick_applies_zero_without_consuming_delta() {
        let applied = StdArc::new(std::sync::Mutex::new(Vec::new()));
        let applied_clone = applied.clone();
        let mut anim = TimeAnimation::new(
            Duration::from_millis(1000),
            StdArc::new(Linear),
            Box::new(move |_layer, ratio| applied_clone.lock().unwrap().push(ratio)),
        );
        let layer = layer_handle();
        let result = anim.run(&layer, Duration::from_millis(999_999));
        assert_eq!(result, TickResult::NotDone);
        assert_eq!(applied.lock().unwrap().as_slice(), &[0.0]);
    }

    #[test]
    fn time_animation_huge_delta_completes_on_second_tick() {
        let applied = StdArc::new(std::sync::Mutex::new(Vec::new()));
        let applied_clone = applied.clone();
        let mut anim = TimeAnimation::new(
            Duration::from_millis(1000),
            StdArc::new(Linear),
            Box::new(move |_layer, ratio| applied_clone.lock().unwrap().push(ratio)),
        );
        let layer = layer_handle();
        anim.run(&layer, Duration::ZERO);
        let result = anim.run(&layer, Duration::MAX);
        assert_eq!(result, TickResult::Done);
        assert_ne!(applied.lock().unwrap().last(), Some(&1.0), "run() alone must not apply the final frame");
        anim.complete(&layer);
        assert_eq!(applied.lock().unwrap().last(), Some(&1.0));
    }

    #[test]
    fn time_animation_completion_fires_exactly_once_with_flag() {
        let calls = StdArc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let mut anim = TimeAnimation::new(Duration::from_millis(100), StdArc::new(Linear), Box::new(|_, _| {}));
        anim.add_completion(Box::new(move |did_complete| {
            assert!(!did_complete);
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));
        let layer = layer_handle();
        anim.cancel(&layer);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn spring_animation_settles_and_completes() {
        let mut anim = SpringAnimation::new(400.0, 40.0, 0.001, Box::new(|_, _| {}));
        anim.set_target(1.0);
        let layer = layer_handle();
        anim.run(&layer, Duration::ZERO); // first tick, applies 0

        let mut done = false;
        for _ in 0..600 {
            if anim.run(&layer, Duration::from_millis(16)) == TickResult::Done {
                done = true;
                break;
            }
        }
        assert!(done);
    }
}
