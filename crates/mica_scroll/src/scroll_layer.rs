//! The scrollable container: content offset/size bookkeeping, rubber-band
//! clamping, paging snap, fading edges, and the drag/wheel gesture
//! bookkeeping that drives a [`crate::scroller::Scroller`].

use std::cell::RefCell;
use std::rc::Rc;

use mica_core::{Direction, Duration, Frame, LayerHandle, Point, Size, Vector};

use crate::scroller::{DragPhase, Scroller};

pub const SCROLL_ANIMATION_KEY: &str = "scrollAnimation";
const RUBBER_BAND_COEFFICIENT: f64 = 0.55;

/// `rubber(x, c, d) = c + sign(c-x) * (1 - 1/(|x-c|*coef/d + 1)) * d`.
pub fn rubber_band(value: f64, clamped: f64, dim: f64) -> f64 {
    if dim <= 0.0 {
        return clamped;
    }
    let diff = (value - clamped).abs();
    let sign = if clamped > value { -1.0 } else { 1.0 };
    let rubber = (1.0 - 1.0 / (diff * RUBBER_BAND_COEFFICIENT / dim + 1.0)) * dim;
    clamped + sign * rubber
}

pub trait ScrollListener {
    /// May override the offset the layer is about to scroll to.
    fn on_scroll(&mut self, scroll: &ScrollLayerHandle, point: Point, velocity: Vector) -> Option<Point>;
    fn on_scroll_end(&mut self, scroll: &ScrollLayerHandle, point: Point);
    fn on_drag_start(&mut self, scroll: &ScrollLayerHandle, point: Point, velocity: Vector);
    /// May override the target offset a fling/drag-end is about to settle on.
    fn on_drag_ending(&mut self, scroll: &ScrollLayerHandle, point: Point, velocity: Vector) -> Option<Point>;
}

/// A perf overlay tracking how much of the session is spent with a scroller
/// actively in motion. Distinct from [`ScrollListener`]: it only cares about
/// the resume/pause edges, not content offsets.
pub trait ScrollPerfLogger {
    fn resume(&mut self);
    fn pause(&mut self, cancelled: bool);
}

pub struct ScrollLayerState {
    pub layer: LayerHandle,
    pub content_layer: LayerHandle,

    content_offset: Point,
    content_size: Size,
    scroll_gesture_offset: Point,

    horizontal: bool,
    bounces: bool,
    bounces_vertical_with_small_content: bool,
    bounces_horizontal_with_small_content: bool,
    paging_enabled: bool,
    fading_edge_length: f64,
    dismiss_keyboard_on_drag: bool,
    request_focus_count: u32,
    perf_logger_started: bool,

    scroller: Option<Box<dyn Scroller>>,
    listener: Option<Box<dyn ScrollListener>>,
    perf_logger: Option<Box<dyn ScrollPerfLogger>>,
}

/// A `Layer`-tree node (`layer`) plus its own content/gesture state,
/// following the same `Rc<RefCell<...>>` handle pattern as `LayerHandle`.
#[derive(Clone)]
pub struct ScrollLayerHandle(Rc<RefCell<ScrollLayerState>>);

impl ScrollLayerHandle {
    pub fn new(layer: LayerHandle, content_layer: LayerHandle) -> Self {
        layer.insert_child(0, content_layer.clone());
        Self(Rc::new(RefCell::new(ScrollLayerState {
            layer,
            content_layer,
            content_offset: Point::ZERO,
            content_size: Size::ZERO,
            scroll_gesture_offset: Point::ZERO,
            horizontal: false,
            bounces: true,
            bounces_vertical_with_small_content: false,
            bounces_horizontal_with_small_content: false,
            paging_enabled: false,
            fading_edge_length: 0.0,
            dismiss_keyboard_on_drag: false,
            request_focus_count: 0,
            perf_logger_started: false,
            scroller: None,
            listener: None,
            perf_logger: None,
        })))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn layer(&self) -> LayerHandle {
        self.0.borrow().layer.clone()
    }

    pub fn set_scroller(&self, scroller: Box<dyn Scroller>) {
        self.0.borrow_mut().scroller = Some(scroller);
    }

    pub fn set_listener(&self, listener: Box<dyn ScrollListener>) {
        self.0.borrow_mut().listener = Some(listener);
    }

    pub fn set_horizontal(&self, horizontal: bool) {
        self.0.borrow_mut().horizontal = horizontal;
        self.update_edge_gradient();
    }

    pub fn set_bounces(&self, bounces: bool) {
        self.0.borrow_mut().bounces = bounces;
    }

    pub fn set_bounces_vertical_with_small_content(&self, value: bool) {
        self.0.borrow_mut().bounces_vertical_with_small_content = value;
    }

    pub fn set_bounces_horizontal_with_small_content(&self, value: bool) {
        self.0.borrow_mut().bounces_horizontal_with_small_content = value;
    }

    pub fn set_paging_enabled(&self, value: bool) {
        self.0.borrow_mut().paging_enabled = value;
    }

    pub fn set_fading_edge_length(&self, length: f64) {
        self.0.borrow_mut().fading_edge_length = length;
        self.update_edge_gradient();
    }

    /// When set, every drag-begin requests focus on the scroll layer's own
    /// node — the same way a text field's surrounding scroller dismisses the
    /// keyboard the moment the user starts dragging.
    pub fn set_dismiss_keyboard_on_drag(&self, value: bool) {
        self.0.borrow_mut().dismiss_keyboard_on_drag = value;
    }

    /// How many times a drag-begin has requested focus so far.
    pub fn request_focus_count(&self) -> u32 {
        self.0.borrow().request_focus_count
    }

    pub fn set_scroll_perf_logger(&self, logger: Box<dyn ScrollPerfLogger>) {
        self.0.borrow_mut().perf_logger = Some(logger);
    }

    fn resume_scroll_perf_logger(&self) {
        let mut state = self.0.borrow_mut();
        if !state.perf_logger_started {
            state.perf_logger_started = true;
            if let Some(logger) = state.perf_logger.as_mut() {
                logger.resume();
            }
        }
    }

    fn pause_scroll_perf_logger(&self) {
        let mut state = self.0.borrow_mut();
        if state.perf_logger_started {
            state.perf_logger_started = false;
            if let Some(logger) = state.perf_logger.as_mut() {
                logger.pause(false);
            }
        }
    }

    pub fn content_offset(&self) -> Point {
        self.0.borrow().content_offset
    }

    fn frame_size(&self) -> Size {
        self.0.borrow().layer.borrow().frame.size()
    }

    fn min_content_offset_x(&self) -> f64 {
        0.0
    }

    fn max_content_offset_x(&self) -> f64 {
        let state = self.0.borrow();
        if state.horizontal {
            (state.content_size.width - self.frame_size().width).max(0.0)
        } else {
            0.0
        }
    }

    fn min_content_offset_y(&self) -> f64 {
        0.0
    }

    fn max_content_offset_y(&self) -> f64 {
        let state = self.0.borrow();
        if state.horizontal {
            0.0
        } else {
            (state.content_size.height - self.frame_size().height).max(0.0)
        }
    }

    pub fn clamp_content_offset_x(&self, x: f64) -> f64 {
        x.clamp(self.min_content_offset_x(), self.max_content_offset_x())
    }

    pub fn clamp_content_offset_y(&self, y: f64) -> f64 {
        y.clamp(self.min_content_offset_y(), self.max_content_offset_y())
    }

    pub fn clamp_content_offset(&self, offset: Point) -> Point {
        Point::new(self.clamp_content_offset_x(offset.x), self.clamp_content_offset_y(offset.y))
    }

    /// Applies `offset` after giving the listener a chance to override it;
    /// returns the adjustment the listener introduced, which the caller
    /// folds back into its own drag bookkeeping to avoid jitter.
    pub fn apply_content_offset(&self, offset: Point, velocity: Vector) -> Vector {
        let mut adjustment = Vector::ZERO;
        let mut resolved = offset;

        let overridden = {
            let mut state = self.0.borrow_mut();
            state.listener.as_mut().and_then(|l| l.on_scroll(self, offset, velocity))
        };

        if let Some(overridden_offset) = overridden {
            adjustment = Vector::new(overridden_offset.x - offset.x, overridden_offset.y - offset.y);
            resolved = overridden_offset;
            let mut state = self.0.borrow_mut();
            state.scroll_gesture_offset.x += adjustment.dx;
            state.scroll_gesture_offset.y += adjustment.dy;
        }

        self.apply_content_offset_internal(resolved);
        adjustment
    }

    fn apply_content_offset_internal(&self, offset: Point) {
        self.0.borrow_mut().content_offset = offset;
        self.update_content_layer_frame();
        self.update_edge_gradient();
    }

    fn update_content_layer_frame(&self) {
        let state = self.0.borrow();
        state.content_layer.borrow_mut().frame =
            Frame::new(-state.content_offset.x, -state.content_offset.y, state.content_size.width, state.content_size.height);
    }

    /// Leading/trailing fade-band lengths for the current offset, following
    /// the scroll axis.
    pub fn fading_edge_lengths(&self) -> Option<(f64, f64)> {
        let state = self.0.borrow();
        if state.fading_edge_length <= 0.0 {
            return None;
        }
        let frame = state.layer.borrow().frame;
        let (leading_extent, trailing_extent) = if state.horizontal {
            (state.content_offset.x, state.content_size.width - frame.width - state.content_offset.x)
        } else {
            (state.content_offset.y, state.content_size.height - frame.height - state.content_offset.y)
        };
        Some((
            leading_extent.clamp(0.0, state.fading_edge_length),
            trailing_extent.clamp(0.0, state.fading_edge_length),
        ))
    }

    fn update_edge_gradient(&self) {
        // The mask layer itself is an external collaborator (rasterizer
        // concern); `fading_edge_lengths` is the pure data it needs.
    }

    pub fn set_content_size(&self, size: Size) {
        self.0.borrow_mut().content_size = size;
        self.update_content_layer_frame();

        let current = self.content_offset();
        let clamped = self.clamp_content_offset(current);
        if clamped != current {
            self.set_content_offset(clamped, Vector::ZERO, false);
        }
    }

    pub fn cancel_scroll_animation(&self) {
        let layer = self.0.borrow().layer.clone();
        layer.take_animation(SCROLL_ANIMATION_KEY);
    }

    pub fn set_content_offset(&self, offset: Point, velocity: Vector, animated: bool) {
        if self.content_offset() == offset {
            return;
        }
        self.cancel_scroll_animation();

        let animation = if animated {
            let mut state = self.0.borrow_mut();
            state.scroller.as_mut().map(|s| s.animate(self.content_offset(), offset, true))
        } else {
            None
        };

        if let Some(animation) = animation {
            self.0.borrow().layer.set_animation(SCROLL_ANIMATION_KEY, animation);
        } else {
            self.apply_content_offset(offset, velocity);
        }
    }

    pub fn on_root_detached(&self) {
        self.cancel_scroll_animation();
        let mut state = self.0.borrow_mut();
        if let Some(scroller) = state.scroller.as_mut() {
            scroller.reset();
        }
    }

    pub fn on_scroll_animation_ended(&self) {
        let (point, listener_present) = {
            let state = self.0.borrow();
            (state.content_offset, state.listener.is_some())
        };
        if listener_present {
            let mut state = self.0.borrow_mut();
            if let Some(listener) = state.listener.as_mut() {
                listener.on_scroll_end(self, point);
            }
        }
        self.pause_scroll_perf_logger();
    }

    fn target_offset_for_interactive_offset(&self, interactive: Point) -> Point {
        let state = self.0.borrow();
        let clamped_x = self.clamp_content_offset_x(interactive.x);
        let clamped_y = self.clamp_content_offset_y(interactive.y);

        let mut target_x = interactive.x;
        let mut target_y = interactive.y;

        if !state.horizontal {
            target_x = clamped_x;
        } else {
            target_y = clamped_y;
        }
        if !state.bounces {
            if !state.bounces_horizontal_with_small_content {
                target_x = clamped_x;
            }
            if !state.bounces_vertical_with_small_content {
                target_y = clamped_y;
            }
        }

        let frame = state.layer.borrow().frame;
        drop(state);
        if target_x != clamped_x {
            target_x = rubber_band(target_x, clamped_x, frame.width);
        }
        if target_y != clamped_y {
            target_y = rubber_band(target_y, clamped_y, frame.height);
        }

        Point::new(target_x, target_y)
    }

    fn compute_paginated_target_offset(&self, content_offset: Point, override_offset: Option<Point>, velocity: Vector) -> Option<Point> {
        let frame = self.0.borrow().layer.borrow().frame;
        let (frame_width, frame_height) = (frame.width, frame.height);
        if frame_width <= 0.0 || frame_height <= 0.0 {
            return override_offset;
        }

        let current = self.content_offset();
        let content_size = self.0.borrow().content_size;

        let min_offset_x = (current.x / frame_width).floor() * frame_width;
        let min_offset_x = min_offset_x.max(0.0);
        let max_offset_x = ((current.x / frame_width).ceil() * frame_width).min(content_size.width - frame_width);
        let min_offset_y = (current.y / frame_height).floor() * frame_height;
        let min_offset_y = min_offset_y.max(0.0);
        let max_offset_y = ((current.y / frame_height).ceil() * frame_height).min(content_size.height - frame_height);

        let final_offset = match override_offset {
            Some(offset) => offset,
            None => {
                let scroller_present = self.0.borrow().scroller.is_some();
                if !scroller_present {
                    return None;
                }
                let mut state = self.0.borrow_mut();
                state
                    .scroller
                    .as_ref()
                    .unwrap()
                    .compute_deceleration_final_offset(content_offset, velocity, Size::new(frame_width, frame_height), true)
            }
        };

        let paginated_x = ((final_offset.x / frame_width).round() * frame_width).clamp(min_offset_x, max_offset_x);
        let paginated_y = ((final_offset.y / frame_height).round() * frame_height).clamp(min_offset_y, max_offset_y);
        Some(Point::new(paginated_x, paginated_y))
    }

    fn paging_enabled(&self) -> bool {
        self.0.borrow().paging_enabled
    }

    fn on_scroll_ended(&self, content_offset: Point, velocity: Vector) {
        let listener_override = {
            let mut state = self.0.borrow_mut();
            state.listener.as_mut().and_then(|l| l.on_drag_ending(self, content_offset, velocity))
        };

        let target_override = if self.paging_enabled() {
            self.compute_paginated_target_offset(content_offset, listener_override, velocity)
        } else {
            listener_override
        };

        if let Some(target) = target_override {
            self.set_content_offset(target, velocity, true);
        } else {
            self.set_content_offset(content_offset, velocity, false);

            let animation = {
                let mut state = self.0.borrow_mut();
                state.scroller.as_mut().map(|s| s.fling(content_offset, velocity, false))
            };
            if let Some(animation) = animation {
                self.0.borrow().layer.set_animation(SCROLL_ANIMATION_KEY, animation);
            }
        }
    }

    /// Drive a drag gesture through the scroll layer's state machine.
    pub fn on_scroll_drag(&self, phase: DragPhase, offset: Vector, velocity: Vector, now: Duration) {
        self.cancel_scroll_animation();

        if matches!(phase, DragPhase::Began) {
            self.0.borrow_mut().scroll_gesture_offset = self.content_offset();
        }

        {
            let mut state = self.0.borrow_mut();
            if let Some(scroller) = state.scroller.as_mut() {
                scroller.on_drag(phase, velocity, now);
            }
        }

        let horizontal = self.0.borrow().horizontal;
        let drag_velocity = if horizontal { Vector::new(velocity.dx, 0.0) } else { Vector::new(0.0, velocity.dy) };
        let gesture_offset = self.0.borrow().scroll_gesture_offset;
        let target_offset =
            self.target_offset_for_interactive_offset(Point::new(gesture_offset.x - offset.dx, gesture_offset.y - offset.dy));

        match phase {
            DragPhase::Began => {
                self.resume_scroll_perf_logger();
                let mut state = self.0.borrow_mut();
                if state.dismiss_keyboard_on_drag {
                    state.request_focus_count += 1;
                }
                if let Some(listener) = state.listener.as_mut() {
                    let point = self.content_offset();
                    listener.on_drag_start(self, point, drag_velocity);
                }
            }
            DragPhase::Ended => {
                self.on_scroll_ended(target_offset, drag_velocity);
            }
            DragPhase::Changed => {
                self.set_content_offset(target_offset, drag_velocity, false);
            }
        }
    }

    pub fn prepare_for_reuse(&self) {
        self.cancel_scroll_animation();
        {
            let mut state = self.0.borrow_mut();
            if let Some(scroller) = state.scroller.as_mut() {
                scroller.reset();
            }
        }
        self.apply_content_offset_internal(Point::ZERO);
        self.pause_scroll_perf_logger();
    }
}

pub fn direction_aware_leading_trailing(direction: Direction, leading: f64, trailing: f64) -> (f64, f64) {
    match direction {
        Direction::Ltr => (leading, trailing),
        Direction::Rtl => (trailing, leading),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::Layer;

    fn handle() -> ScrollLayerHandle {
        ScrollLayerHandle::new(LayerHandle::new(Layer::default()), LayerHandle::new(Layer::default()))
    }

    #[test]
    fn drag_start_requests_focus_only_when_dismiss_keyboard_on_drag_is_set() {
        let scroll = handle();
        scroll.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 100.0, 200.0);
        scroll.set_content_size(Size::new(100.0, 1000.0));

        scroll.on_scroll_drag(DragPhase::Began, Vector::ZERO, Vector::ZERO, Duration::ZERO);
        assert_eq!(scroll.request_focus_count(), 0, "disabled by default, so drag-start must not request focus");

        scroll.set_dismiss_keyboard_on_drag(true);
        scroll.on_scroll_drag(DragPhase::Began, Vector::ZERO, Vector::ZERO, Duration::ZERO);
        assert_eq!(scroll.request_focus_count(), 1);

        scroll.on_scroll_drag(DragPhase::Changed, Vector::new(0.0, 10.0), Vector::ZERO, Duration::ZERO);
        assert_eq!(scroll.request_focus_count(), 1, "only drag-start should request focus, not drag-changed");

        scroll.on_scroll_drag(DragPhase::Began, Vector::ZERO, Vector::ZERO, Duration::ZERO);
        assert_eq!(scroll.request_focus_count(), 2, "a second drag-start requests focus again");
    }

    /// Tracks a scroll-in-progress counter the way a perf overlay would:
    /// resumed while dragging, paused once the gesture settles.
    struct RecordingPerfLogger {
        resumes: Rc<RefCell<u32>>,
        pauses: Rc<RefCell<u32>>,
    }

    impl ScrollPerfLogger for RecordingPerfLogger {
        fn resume(&mut self) {
            *self.resumes.borrow_mut() += 1;
        }
        fn pause(&mut self, _cancelled: bool) {
            *self.pauses.borrow_mut() += 1;
        }
    }

    #[test]
    fn perf_logger_resumes_on_drag_start_and_pauses_once_the_fling_settles() {
        let scroll = handle();
        scroll.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 100.0, 200.0);
        scroll.set_content_size(Size::new(100.0, 1000.0));
        scroll.set_scroller(Box::new(crate::scroller::AndroidScroller::new(scroll.clone())));
        let resumes = Rc::new(RefCell::new(0));
        let pauses = Rc::new(RefCell::new(0));
        scroll.set_scroll_perf_logger(Box::new(RecordingPerfLogger { resumes: resumes.clone(), pauses: pauses.clone() }));

        scroll.on_scroll_drag(DragPhase::Began, Vector::ZERO, Vector::ZERO, Duration::ZERO);
        assert_eq!(*resumes.borrow(), 1);

        scroll.on_scroll_drag(DragPhase::Changed, Vector::new(0.0, 50.0), Vector::ZERO, Duration::from_millis(16));
        scroll.on_scroll_drag(DragPhase::Ended, Vector::new(0.0, 50.0), Vector::new(0.0, 3000.0), Duration::from_millis(32));

        assert_eq!(*pauses.borrow(), 0, "the fling animation has only just been installed");

        let layer = scroll.layer();
        for _ in 0..600 {
            if !layer.has_animation(SCROLL_ANIMATION_KEY) {
                break;
            }
            layer.tick_animation(SCROLL_ANIMATION_KEY, Duration::from_millis(16));
        }
        assert!(!layer.has_animation(SCROLL_ANIMATION_KEY), "fling should have settled within the iteration budget");
        assert_eq!(*pauses.borrow(), 1);
    }

    #[test]
    fn fling_past_content_extent_bounces_back_to_exactly_the_clamped_offset() {
        let scroll = handle();
        scroll.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 400.0, 800.0);
        scroll.set_content_size(Size::new(400.0, 1600.0));
        scroll.set_scroller(Box::new(crate::scroller::IosScroller::new(scroll.clone())));

        scroll.on_scroll_drag(DragPhase::Began, Vector::ZERO, Vector::ZERO, Duration::ZERO);
        scroll.on_scroll_drag(DragPhase::Changed, Vector::new(0.0, -700.0), Vector::ZERO, Duration::from_millis(16));
        assert_eq!(scroll.content_offset().y, 700.0);
        scroll.on_scroll_drag(DragPhase::Ended, Vector::new(0.0, -700.0), Vector::new(0.0, 3000.0), Duration::from_millis(32));

        let layer = scroll.layer();
        for _ in 0..2000 {
            if !layer.has_animation(SCROLL_ANIMATION_KEY) {
                break;
            }
            layer.tick_animation(SCROLL_ANIMATION_KEY, Duration::from_millis(16));
        }
        assert!(!layer.has_animation(SCROLL_ANIMATION_KEY), "fling and its boundary bounce should settle within the iteration budget");
        assert_eq!(scroll.content_offset().y, 800.0);
    }

    /// A scroller stub that reports an arbitrary, directly-controlled
    /// deceleration landing spot — isolating pagination's own
    /// round-to-nearest-page/one-page-cap logic from real fling physics.
    struct OvershootScroller {
        scroll: ScrollLayerHandle,
        final_offset: Point,
    }

    impl Scroller for OvershootScroller {
        fn reset(&mut self) {}
        fn on_drag(&mut self, _phase: DragPhase, _velocity: Vector, _now: Duration) {}
        fn compute_deceleration_final_offset(&self, _content_offset: Point, _velocity: Vector, _page_size: Size, _fast: bool) -> Point {
            self.final_offset
        }
        fn fling(&mut self, _source_offset: Point, _velocity: Vector, _fast: bool) -> Box<dyn mica_core::Animation> {
            unreachable!("paging is enabled, so on_scroll_ended always resolves a pagination target first")
        }
        fn animate(&mut self, source_offset: Point, target_offset: Point, fast: bool) -> Box<dyn mica_core::Animation> {
            Box::new(crate::animation::ScrollAnimationAdapter::new(
                self.scroll.clone(),
                crate::animation::AndroidContentOffsetAnimation::new(source_offset, target_offset, fast),
            ))
        }
    }

    #[test]
    fn paging_snaps_to_the_neighboring_page_on_a_large_velocity_fling() {
        let scroll = handle();
        scroll.set_horizontal(true);
        scroll.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 400.0, 800.0);
        scroll.set_content_size(Size::new(2000.0, 800.0));
        scroll.set_paging_enabled(true);
        scroll.set_scroller(Box::new(OvershootScroller { scroll: scroll.clone(), final_offset: Point::new(2000.0, 0.0) }));

        scroll.on_scroll_drag(DragPhase::Began, Vector::ZERO, Vector::ZERO, Duration::ZERO);
        scroll.on_scroll_drag(DragPhase::Changed, Vector::new(-401.0, 0.0), Vector::ZERO, Duration::from_millis(16));
        assert_eq!(scroll.content_offset().x, 401.0, "just past the first page boundary");
        scroll.on_scroll_drag(DragPhase::Ended, Vector::new(-401.0, 0.0), Vector::new(8000.0, 0.0), Duration::from_millis(32));

        let layer = scroll.layer();
        for _ in 0..100 {
            if !layer.has_animation(SCROLL_ANIMATION_KEY) {
                break;
            }
            layer.tick_animation(SCROLL_ANIMATION_KEY, Duration::from_millis(16));
        }
        assert!(!layer.has_animation(SCROLL_ANIMATION_KEY), "the page-snap animation should settle within the iteration budget");
        assert_eq!(scroll.content_offset().x, 800.0, "a large-velocity fling may advance at most one further page");
    }

    #[test]
    fn rubber_band_pulls_towards_clamp_without_reaching_it() {
        let result = rubber_band(150.0, 100.0, 300.0);
        assert!(result > 100.0 && result < 150.0);
    }

    #[test]
    fn rubber_band_identity_at_clamp() {
        assert_eq!(rubber_band(100.0, 100.0, 300.0), 100.0);
    }

    #[test]
    fn clamp_content_offset_clamps_to_content_extent() {
        let scroll = handle();
        scroll.set_horizontal(false);
        scroll.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 100.0, 200.0);
        scroll.set_content_size(Size::new(100.0, 1000.0));
        assert_eq!(scroll.clamp_content_offset(Point::new(0.0, 5000.0)).y, 800.0);
    }

    #[test]
    fn shrinking_content_size_reclamps_an_out_of_range_offset() {
        let scroll = handle();
        scroll.set_horizontal(false);
        scroll.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 100.0, 200.0);
        scroll.set_content_size(Size::new(100.0, 1000.0));
        scroll.set_content_offset(Point::new(0.0, 800.0), Vector::ZERO, false);
        assert_eq!(scroll.content_offset().y, 800.0);

        scroll.set_content_size(Size::new(100.0, 300.0));
        assert_eq!(scroll.content_offset().y, 100.0);
    }

    #[test]
    fn fading_edges_are_zero_without_length_configured() {
        let scroll = handle();
        assert!(scroll.fading_edge_lengths().is_none());
    }

    #[test]
    fn fading_edges_clamp_to_configured_length() {
        let scroll = handle();
        scroll.layer().borrow_mut().frame = Frame::new(0.0, 0.0, 100.0, 200.0);
        scroll.set_content_size(Size::new(100.0, 1000.0));
        scroll.set_fading_edge_length(20.0);
        scroll.set_content_offset(Point::new(0.0, 5.0), Vector::ZERO, false);
        let (leading, trailing) = scroll.fading_edge_lengths().unwrap();
        assert_eq!(leading, 5.0);
        assert_eq!(trailing, 20.0);
    }
}
