//! Platform scroll state machines: own the carried-velocity bookkeeping for
//! a scroll layer and produce the fling/content-offset animations that
//! drive it.

use std::cell::RefCell;
use std::rc::Rc;

use mica_core::{Animation, Duration, Point, Size, Vector};

use crate::animation::{AndroidContentOffsetAnimation, FlingAnimation, IosContentOffsetAnimation, ScrollAnimationAdapter};
use crate::carried_velocity::{AndroidCarriedVelocity, IosCarriedVelocity};
use crate::decay;
use crate::scroll_layer::ScrollLayerHandle;
use crate::spline::SplinePhysics;

/// Android's `OverScroller` default fling friction.
pub const DEFAULT_SCROLL_FRICTION: f64 = 0.015;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Began,
    Changed,
    Ended,
}

/// Platform scroll physics: decides what a fling/programmatic animation
/// looks like and tracks momentum carried between gestures.
pub trait Scroller {
    fn reset(&mut self);
    fn on_drag(&mut self, phase: DragPhase, velocity: Vector, now: Duration);
    fn compute_deceleration_final_offset(&self, content_offset: Point, velocity: Vector, page_size: Size, fast: bool) -> Point;
    fn fling(&mut self, source_offset: Point, velocity: Vector, fast: bool) -> Box<dyn Animation>;
    fn animate(&mut self, source_offset: Point, target_offset: Point, fast: bool) -> Box<dyn Animation>;
}

pub struct AndroidScroller {
    scroll: ScrollLayerHandle,
    scroll_friction: f64,
    carried: Rc<RefCell<AndroidCarriedVelocity>>,
}

impl AndroidScroller {
    pub fn new(scroll: ScrollLayerHandle) -> Self {
        Self::with_friction(scroll, DEFAULT_SCROLL_FRICTION)
    }

    pub fn with_friction(scroll: ScrollLayerHandle, scroll_friction: f64) -> Self {
        Self {
            scroll,
            scroll_friction,
            carried: Rc::new(RefCell::new(AndroidCarriedVelocity::default())),
        }
    }
}

impl Scroller for AndroidScroller {
    fn reset(&mut self) {
        self.carried.borrow_mut().reset();
    }

    fn on_drag(&mut self, phase: DragPhase, velocity: Vector, _now: Duration) {
        if phase == DragPhase::Began {
            self.carried.borrow_mut().on_drag(velocity);
        }
    }

    fn compute_deceleration_final_offset(&self, content_offset: Point, velocity: Vector, _page_size: Size, _fast: bool) -> Point {
        let physics = SplinePhysics::new(self.scroll_friction, velocity);
        let result = physics.compute(Duration::MAX);
        Point::new(content_offset.x + result.distance.dx, content_offset.y + result.distance.dy)
    }

    fn fling(&mut self, source_offset: Point, velocity: Vector, _fast: bool) -> Box<dyn Animation> {
        let carried = self.carried.borrow().velocity();
        let resolved_velocity = Vector::new(velocity.dx + carried.dx, velocity.dy + carried.dy);
        let inner = FlingAnimation::android(self.scroll_friction, source_offset, resolved_velocity, Rc::clone(&self.carried));
        Box::new(ScrollAnimationAdapter::new(self.scroll.clone(), inner))
    }

    fn animate(&mut self, source_offset: Point, target_offset: Point, fast: bool) -> Box<dyn Animation> {
        let inner = AndroidContentOffsetAnimation::new(source_offset, target_offset, fast);
        Box::new(ScrollAnimationAdapter::new(self.scroll.clone(), inner))
    }
}

pub struct IosScroller {
    scroll: ScrollLayerHandle,
    carried: Rc<RefCell<IosCarriedVelocity>>,
}

impl IosScroller {
    pub fn new(scroll: ScrollLayerHandle) -> Self {
        Self {
            scroll,
            carried: Rc::new(RefCell::new(IosCarriedVelocity::default())),
        }
    }
}

impl Scroller for IosScroller {
    fn reset(&mut self) {
        self.carried.borrow_mut().reset();
    }

    fn on_drag(&mut self, phase: DragPhase, velocity: Vector, now: Duration) {
        match phase {
            DragPhase::Began => self.carried.borrow_mut().on_drag_began(velocity, now),
            DragPhase::Ended => self.carried.borrow_mut().on_drag_ended(velocity, now),
            DragPhase::Changed => {}
        }
    }

    fn compute_deceleration_final_offset(&self, content_offset: Point, velocity: Vector, _page_size: Size, fast: bool) -> Point {
        decay::final_offset(content_offset, velocity, fast)
    }

    fn fling(&mut self, source_offset: Point, velocity: Vector, fast: bool) -> Box<dyn Animation> {
        let carried = self.carried.borrow().velocity();
        let resolved_velocity = Vector::new(velocity.dx + carried.dx, velocity.dy + carried.dy);
        let inner = FlingAnimation::ios(source_offset, resolved_velocity, fast, Rc::clone(&self.carried));
        Box::new(ScrollAnimationAdapter::new(self.scroll.clone(), inner))
    }

    fn animate(&mut self, source_offset: Point, target_offset: Point, fast: bool) -> Box<dyn Animation> {
        let inner = IosContentOffsetAnimation::new(source_offset, target_offset, fast);
        Box::new(ScrollAnimationAdapter::new(self.scroll.clone(), inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::{Layer, LayerHandle};

    fn scroll_handle() -> ScrollLayerHandle {
        ScrollLayerHandle::new(LayerHandle::new(Layer::default()), LayerHandle::new(Layer::default()))
    }

    #[test]
    fn android_deceleration_final_offset_moves_in_velocity_direction() {
        let scroller = AndroidScroller::new(scroll_handle());
        let offset = scroller.compute_deceleration_final_offset(Point::ZERO, Vector::new(3000.0, 0.0), Size::new(100.0, 100.0), true);
        assert!(offset.x > 0.0);
    }

    #[test]
    fn ios_deceleration_final_offset_moves_in_velocity_direction() {
        let scroller = IosScroller::new(scroll_handle());
        let offset = scroller.compute_deceleration_final_offset(Point::ZERO, Vector::new(3000.0, 0.0), Size::new(100.0, 100.0), false);
        assert!(offset.x > 0.0);
    }

    #[test]
    fn android_carried_velocity_resets_on_reset() {
        let mut scroller = AndroidScroller::new(scroll_handle());
        scroller.carried.borrow_mut().update(Vector::new(500.0, 0.0));
        scroller.reset();
        assert_eq!(scroller.carried.borrow().velocity(), Vector::ZERO);
    }
}
