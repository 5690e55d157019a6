//! Scroll animations: a `mica_core::Animation` adapter around a smaller
//! `ScrollUpdate` contract, generalizing the "first tick is a throwaway
//! frame, cancel/complete both just notify the scroll layer" boilerplate
//! shared by every content-offset and fling animation.

use std::cell::RefCell;
use std::rc::Rc;

use mica_core::{Animation, Duration, LayerHandle, Point, TickResult, Vector};

use crate::carried_velocity::{AndroidCarriedVelocity, IosCarriedVelocity};
use crate::decay;
use crate::scroll_layer::ScrollLayerHandle;
use crate::spline::SplinePhysics;
use crate::spring_bounce::{SpringBounceConfig, SpringBouncePhysics};

/// One fling/content-offset animation's per-tick behavior. `true` means done.
pub trait ScrollUpdate: Send {
    fn update(&mut self, scroll: &ScrollLayerHandle, delta: Duration) -> bool;
}

/// Generalizes `BaseScrollLayerAnimation`: skips the first tick (its `delta`
/// is unreliable), and notifies the scroll layer on cancel/complete/done.
pub struct ScrollAnimationAdapter<T: ScrollUpdate> {
    scroll: ScrollLayerHandle,
    inner: T,
    started: bool,
}

impl<T: ScrollUpdate> ScrollAnimationAdapter<T> {
    pub fn new(scroll: ScrollLayerHandle, inner: T) -> Self {
        Self {
            scroll,
            inner,
            started: false,
        }
    }
}

impl<T: ScrollUpdate> Animation for ScrollAnimationAdapter<T> {
    fn run(&mut self, _layer: &LayerHandle, delta: Duration) -> TickResult {
        if !self.started {
            self.started = true;
            return TickResult::NotDone;
        }

        if self.inner.update(&self.scroll, delta) {
            TickResult::Done
        } else {
            TickResult::NotDone
        }
    }

    fn cancel(&mut self, _layer: &LayerHandle) {
        self.scroll.on_scroll_animation_ended();
    }

    fn complete(&mut self, _layer: &LayerHandle) {
        self.scroll.on_scroll_animation_ended();
    }

    fn add_completion(&mut self, _callback: Box<dyn FnOnce(bool) + Send>) {
        // Scroll animations don't support completions upstream either.
    }
}

// ---------------------------------------------------------------------
// Programmatic content-offset animations
// ---------------------------------------------------------------------

/// Android: eases between the two offsets over a fixed duration.
pub struct AndroidContentOffsetAnimation {
    source: Point,
    target: Point,
    duration: Duration,
    elapsed: Duration,
}

impl AndroidContentOffsetAnimation {
    pub fn new(source: Point, target: Point, fast: bool) -> Self {
        Self {
            source,
            target,
            duration: if fast { Duration::from_millis(250) } else { Duration::from_millis(400) },
            elapsed: Duration::ZERO,
        }
    }
}

impl ScrollUpdate for AndroidContentOffsetAnimation {
    fn update(&mut self, scroll: &ScrollLayerHandle, delta: Duration) -> bool {
        self.elapsed = self.elapsed + delta;
        if self.elapsed >= self.duration {
            scroll.apply_content_offset(self.target, Vector::ZERO);
            return true;
        }

        let ratio = mica_animation::ViscousFluid::new().ease(self.elapsed.as_secs_f64() / self.duration.as_secs_f64());
        let current = Point::new(
            mica_animation::lerp(self.source.x, self.target.x, ratio),
            mica_animation::lerp(self.source.y, self.target.y, ratio),
        );
        let adjustment = scroll.apply_content_offset(current, Vector::ZERO);
        self.source.x += adjustment.dx;
        self.source.y += adjustment.dy;
        false
    }
}

/// iOS: drives by the decay curve's own closed-form velocity/duration, so
/// the ease feels continuous with a physical fling rather than a fixed time.
pub struct IosContentOffsetAnimation {
    offset: Point,
    target: Point,
    velocity: Vector,
    duration: Duration,
    elapsed: Duration,
    fast: bool,
}

impl IosContentOffsetAnimation {
    pub fn new(source: Point, target: Point, fast: bool) -> Self {
        let velocity = decay::initial_velocity_for_offsets(source, target, fast);
        let duration = decay::duration(velocity, false);
        Self {
            offset: source,
            target,
            velocity,
            duration,
            elapsed: Duration::ZERO,
            fast,
        }
    }
}

impl ScrollUpdate for IosContentOffsetAnimation {
    fn update(&mut self, scroll: &ScrollLayerHandle, delta: Duration) -> bool {
        self.elapsed = self.elapsed + delta;
        if self.elapsed > self.duration {
            scroll.apply_content_offset(self.target, Vector::ZERO);
            return true;
        }

        let offset = decay::position_vector(self.offset, self.velocity, self.elapsed, self.fast);
        let adjustment = scroll.apply_content_offset(offset, Vector::ZERO);
        self.offset.x += adjustment.dx;
        self.offset.y += adjustment.dy;
        false
    }
}

// ---------------------------------------------------------------------
// Fling animations (generalizes SpringFlingScrollLayerAnimation)
// ---------------------------------------------------------------------

trait CarriedVelocitySink {
    fn update(&self, velocity: Vector);
}

impl CarriedVelocitySink for Rc<RefCell<AndroidCarriedVelocity>> {
    fn update(&self, velocity: Vector) {
        self.borrow_mut().update(velocity);
    }
}

impl CarriedVelocitySink for Rc<RefCell<IosCarriedVelocity>> {
    fn update(&self, velocity: Vector) {
        self.borrow_mut().update(velocity);
    }
}

enum Decelerate {
    Android {
        physics: SplinePhysics,
        source_offset: Point,
        carried: Rc<RefCell<AndroidCarriedVelocity>>,
    },
    Ios {
        source_offset: Point,
        velocity: Vector,
        fast: bool,
        carried: Rc<RefCell<IosCarriedVelocity>>,
    },
}

struct Bounce {
    physics: SpringBouncePhysics,
    target_offset: Point,
}

/// Decelerate under platform physics; hand off to a spring bounce the
/// instant the content offset would exceed its clampable range.
pub struct FlingAnimation {
    elapsed: Duration,
    decel: Decelerate,
    bounce: Option<Bounce>,
    bounce_config: SpringBounceConfig,
}

impl FlingAnimation {
    pub fn android(scroll_friction: f64, source_offset: Point, velocity: Vector, carried: Rc<RefCell<AndroidCarriedVelocity>>) -> Self {
        Self {
            elapsed: Duration::ZERO,
            decel: Decelerate::Android {
                physics: SplinePhysics::new(scroll_friction, velocity),
                source_offset,
                carried,
            },
            bounce: None,
            bounce_config: SpringBounceConfig::android(),
        }
    }

    pub fn ios(source_offset: Point, velocity: Vector, fast: bool, carried: Rc<RefCell<IosCarriedVelocity>>) -> Self {
        Self {
            elapsed: Duration::ZERO,
            decel: Decelerate::Ios {
                source_offset,
                velocity,
                fast,
                carried,
            },
            bounce: None,
            bounce_config: SpringBounceConfig::ios(),
        }
    }

    fn start_bouncing(&mut self, scroll: &ScrollLayerHandle, velocity: Vector, source_offset: Point, target_offset: Point, start_time: Duration) -> bool {
        let displacement = Vector::new(source_offset.x - target_offset.x, source_offset.y - target_offset.y);
        self.elapsed = start_time;
        self.bounce = Some(Bounce {
            physics: SpringBouncePhysics::new(self.bounce_config, velocity, displacement),
            target_offset,
        });
        self.on_bounce(scroll)
    }

    fn on_bounce(&mut self, scroll: &ScrollLayerHandle) -> bool {
        let bounce = self.bounce.as_mut().expect("bounce phase entered without bounce state");
        let result = bounce.physics.compute(self.elapsed);

        match &self.decel {
            Decelerate::Android { carried, .. } => carried.update(result.velocity),
            Decelerate::Ios { carried, .. } => carried.update(result.velocity),
        }

        let new_offset = Point::new(bounce.target_offset.x + result.distance.dx, bounce.target_offset.y + result.distance.dy);
        let adjustment = scroll.apply_content_offset(new_offset, Vector::ZERO);
        bounce.target_offset.x += adjustment.dx;
        bounce.target_offset.y += adjustment.dy;

        result.finished
    }

    fn on_decelerate_android(&mut self, scroll: &ScrollLayerHandle) -> bool {
        let (contact_offset, clamped, velocity) = {
            let Decelerate::Android { physics, source_offset, .. } = &self.decel else { unreachable!() };
            let result = physics.compute(self.elapsed);
            let content_offset = Point::new(source_offset.x + result.distance.dx, source_offset.y + result.distance.dy);
            let clamped = scroll.clamp_content_offset(content_offset);
            (content_offset, clamped, result.velocity)
        };

        if clamped != contact_offset {
            return self.start_bouncing(scroll, velocity, contact_offset, clamped, Duration::ZERO);
        }

        let adjustment = scroll.apply_content_offset(contact_offset, Vector::ZERO);
        let Decelerate::Android { source_offset, carried, .. } = &mut self.decel else { unreachable!() };
        source_offset.x += adjustment.dx;
        source_offset.y += adjustment.dy;
        carried.update(velocity);

        let Decelerate::Android { physics, .. } = &self.decel else { unreachable!() };
        physics.compute(self.elapsed).finished
    }

    fn on_decelerate_ios(&mut self, scroll: &ScrollLayerHandle) -> bool {
        let (source_offset, velocity, fast) = {
            let Decelerate::Ios { source_offset, velocity, fast, .. } = &self.decel else { unreachable!() };
            (*source_offset, *velocity, *fast)
        };

        let decel_offset = decay::position_vector(source_offset, velocity, self.elapsed, fast);
        let decel_velocity = decay::velocity_vector(velocity, self.elapsed, fast);
        let clamped = scroll.clamp_content_offset(decel_offset);

        if clamped != decel_offset {
            let handoff_duration = decay::time_to_target(source_offset, velocity, clamped, fast);
            let (start_time, velocity_at_boundary, bounce_source) = match handoff_duration {
                Some(d) => (self.elapsed - d, decay::velocity_vector(velocity, d, fast), clamped),
                None => (Duration::ZERO, decel_velocity, decel_offset),
            };
            return self.start_bouncing(scroll, velocity_at_boundary, bounce_source, clamped, start_time);
        }

        let low_velocity = (decel_velocity.dx * decel_velocity.dx + decel_velocity.dy * decel_velocity.dy).sqrt()
            < crate::spring_bounce::MIN_OVERSCROLL_VELOCITY;
        if low_velocity {
            return true;
        }

        let adjustment = scroll.apply_content_offset(decel_offset, Vector::ZERO);
        let Decelerate::Ios { source_offset, carried, .. } = &mut self.decel else { unreachable!() };
        source_offset.x += adjustment.dx;
        source_offset.y += adjustment.dy;
        carried.update(decel_velocity);
        false
    }
}

impl ScrollUpdate for FlingAnimation {
    fn update(&mut self, scroll: &ScrollLayerHandle, delta: Duration) -> bool {
        self.elapsed = self.elapsed + delta;

        if self.bounce.is_some() {
            self.on_bounce(scroll)
        } else {
            match &self.decel {
                Decelerate::Android { .. } => self.on_decelerate_android(scroll),
                Decelerate::Ios { .. } => self.on_decelerate_ios(scroll),
            }
        }
    }
}
