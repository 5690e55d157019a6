//! A layer that plays an animated image over a configurable time window.
//!
//! Mica never decodes or draws images itself (that's a rasterizer/asset
//! concern) — [`AnimatedImageSource`] is the minimal seam a host provides,
//! mirroring how [`mica_core::Canvas`] seams out rasterization.

use std::cell::RefCell;
use std::rc::Rc;

use mica_core::{Animation, Duration, LayerHandle, TickResult};

const ANIMATION_KEY: &str = "imgAnim";

/// What an animated image needs to expose for this layer to play it.
pub trait AnimatedImageSource {
    fn duration(&self) -> Duration;
}

pub trait AnimatedImageLayerListener {
    fn on_progress(&mut self, layer: &AnimatedImageLayerHandle, current_time: Duration, duration: Duration);
}

struct AnimatedImageLayerState<I> {
    layer: LayerHandle,
    image: Option<I>,
    listener: Option<Box<dyn AnimatedImageLayerListener>>,
    current_time: Duration,
    animation_start_time: Duration,
    animation_end_time: Duration,
    clamped_start_time: Duration,
    clamped_end_time: Duration,
    should_loop: bool,
    advance_rate: f64,
}

/// A `Layer`-tree node that plays an [`AnimatedImageSource`] over
/// `[clamped_start_time, clamped_end_time]`, following the same
/// `Rc<RefCell<...>>` handle pattern as [`mica_core::LayerHandle`].
#[derive(Clone)]
pub struct AnimatedImageLayerHandle<I>(Rc<RefCell<AnimatedImageLayerState<I>>>);

impl<I: AnimatedImageSource + Clone + 'static> AnimatedImageLayerHandle<I> {
    pub fn new(layer: LayerHandle) -> Self {
        Self(Rc::new(RefCell::new(AnimatedImageLayerState {
            layer,
            image: None,
            listener: None,
            current_time: Duration::ZERO,
            animation_start_time: Duration::ZERO,
            animation_end_time: Duration::ZERO,
            clamped_start_time: Duration::ZERO,
            clamped_end_time: Duration::ZERO,
            should_loop: false,
            advance_rate: 0.0,
        })))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn layer(&self) -> LayerHandle {
        self.0.borrow().layer.clone()
    }

    pub fn current_time(&self) -> Duration {
        self.0.borrow().current_time
    }

    fn source_duration(&self) -> Duration {
        self.0.borrow().image.as_ref().map(|i| i.duration()).unwrap_or(Duration::ZERO)
    }

    pub fn set_listener(&self, listener: Box<dyn AnimatedImageLayerListener>) {
        self.0.borrow_mut().listener = Some(listener);
    }

    pub fn set_image(&self, image: Option<I>) {
        let had_image = self.0.borrow().image.is_some();
        self.0.borrow_mut().image = image;
        self.update_animation_time_window();
        self.update_active_animation();
        if !had_image {
            let current = self.0.borrow().current_time;
            self.set_current_time_internal(current, false, true);
        } else {
            self.set_current_time_internal(Duration::ZERO, false, true);
        }
    }

    pub fn set_should_loop(&self, should_loop: bool) {
        self.0.borrow_mut().should_loop = should_loop;
    }

    pub fn set_advance_rate(&self, advance_rate: f64) {
        let changed = self.0.borrow().advance_rate != advance_rate;
        if changed {
            self.0.borrow_mut().advance_rate = advance_rate;
            self.update_active_animation();
        }
    }

    pub fn set_animation_start_time(&self, start_time: Duration) {
        self.0.borrow_mut().animation_start_time = start_time;
        self.update_animation_time_window();
    }

    pub fn set_animation_end_time(&self, end_time: Duration) {
        self.0.borrow_mut().animation_end_time = end_time;
        self.update_animation_time_window();
    }

    /// Jump to `current_time` relative to the clamped play window's start.
    pub fn set_current_time(&self, current_time: Duration) {
        self.set_current_time_internal(current_time, true, false);
    }

    fn set_current_time_internal(&self, current_time: Duration, relative: bool, force_notify: bool) {
        let mut should_notify = force_notify;

        let has_image = self.0.borrow().image.is_some();
        let new_time = if !has_image {
            current_time
        } else if relative {
            let (clamped_start, clamped_end, should_loop) = {
                let state = self.0.borrow();
                (state.clamped_start_time, state.clamped_end_time, state.should_loop)
            };
            if should_loop {
                let duration = clamped_end - clamped_start;
                (current_time % duration) + clamped_start
            } else {
                (clamped_start + current_time).clamp(clamped_start, clamped_end)
            }
        } else {
            let (clamped_start, clamped_end, should_loop) = {
                let state = self.0.borrow();
                (state.clamped_start_time, state.clamped_end_time, state.should_loop)
            };
            if should_loop {
                let duration = self.source_duration();
                (current_time % duration).clamp(clamped_start, clamped_end)
            } else {
                current_time.clamp(clamped_start, clamped_end)
            }
        };

        let changed = self.0.borrow().current_time != new_time;
        if changed {
            self.0.borrow_mut().current_time = new_time;
            should_notify = true;
        }

        if should_notify {
            let duration = self.source_duration();
            let mut state = self.0.borrow_mut();
            if let Some(listener) = state.listener.as_mut() {
                listener.on_progress(self, new_time, duration);
            }
        }
    }

    /// Advance `current_time` by `delta * advance_rate`; returns `true` once
    /// the non-looping window's end has been reached.
    pub fn advance_time(&self, delta: Duration) -> bool {
        let (current_time, advance_rate, clamped_start, clamped_end, should_loop) = {
            let state = self.0.borrow();
            (state.current_time, state.advance_rate, state.clamped_start_time, state.clamped_end_time, state.should_loop)
        };

        let window = clamped_end - clamped_start;
        let mut new_time = current_time + Duration::from_secs_f64(delta.as_secs_f64() * advance_rate) - clamped_start;
        let mut reached_end = false;

        if window <= Duration::ZERO {
            new_time = Duration::ZERO;
            reached_end = !should_loop;
        } else if new_time > window {
            if should_loop {
                new_time = new_time % window;
            } else {
                new_time = window;
                reached_end = true;
            }
        } else if new_time < Duration::ZERO {
            if should_loop {
                new_time = window + (new_time % window);
            } else {
                new_time = Duration::ZERO;
                reached_end = true;
            }
        }

        new_time = new_time + clamped_start;
        self.set_current_time_internal(new_time, false, false);
        reached_end
    }

    fn update_active_animation(&self) {
        let layer = self.0.borrow().layer.clone();
        let has_image = self.0.borrow().image.is_some();
        let advance_rate = self.0.borrow().advance_rate;

        if layer.root_handle().is_none() || !has_image || advance_rate == 0.0 {
            layer.take_animation(ANIMATION_KEY);
        } else if !layer.has_animation(ANIMATION_KEY) {
            layer.set_animation(ANIMATION_KEY, Box::new(ImageAnimation::new(self.clone())));
        }
    }

    /// Call after attaching or detaching `layer()` from a live root.
    pub fn on_root_changed(&self) {
        self.update_active_animation();
    }

    fn update_animation_time_window(&self) {
        if self.0.borrow().image.is_none() {
            let mut state = self.0.borrow_mut();
            state.clamped_start_time = Duration::ZERO;
            state.clamped_end_time = Duration::ZERO;
            return;
        }

        let duration = self.source_duration();
        let (animation_start_time, animation_end_time) = {
            let state = self.0.borrow();
            (state.animation_start_time, state.animation_end_time)
        };

        let clamped_start = animation_start_time.clamp(Duration::ZERO, duration);
        let mut clamped_end = if animation_end_time > Duration::ZERO {
            animation_end_time.clamp(Duration::ZERO, duration)
        } else {
            duration
        };
        if clamped_end < clamped_start {
            clamped_end = clamped_start;
        }

        let mut state = self.0.borrow_mut();
        state.clamped_start_time = clamped_start;
        state.clamped_end_time = clamped_end;
    }
}

/// Drives [`AnimatedImageLayerHandle::advance_time`] every tick. `cancel`,
/// `complete`, and `add_completion` are deliberately no-ops: this animation
/// never ends on its own terms and nothing downstream awaits its
/// completion.
struct ImageAnimation<I> {
    layer: AnimatedImageLayerHandle<I>,
}

impl<I: AnimatedImageSource + Clone + 'static> ImageAnimation<I> {
    fn new(layer: AnimatedImageLayerHandle<I>) -> Self {
        Self { layer }
    }
}

impl<I: AnimatedImageSource + Clone + 'static> Animation for ImageAnimation<I> {
    fn run(&mut self, _layer: &LayerHandle, delta: Duration) -> TickResult {
        self.layer.advance_time(delta);
        TickResult::NotDone
    }

    fn cancel(&mut self, _layer: &LayerHandle) {}

    fn complete(&mut self, _layer: &LayerHandle) {}

    fn add_completion(&mut self, _callback: Box<dyn FnOnce(bool) + Send>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::Layer;

    #[derive(Clone)]
    struct FakeImage {
        duration: Duration,
    }

    impl AnimatedImageSource for FakeImage {
        fn duration(&self) -> Duration {
            self.duration
        }
    }

    fn handle() -> AnimatedImageLayerHandle<FakeImage> {
        AnimatedImageLayerHandle::new(LayerHandle::new(Layer::default()))
    }

    #[test]
    fn advancing_past_end_clamps_when_not_looping() {
        let layer = handle();
        layer.set_image(Some(FakeImage { duration: Duration::from_secs_f64(2.0) }));
        layer.set_advance_rate(1.0);
        assert!(layer.advance_time(Duration::from_secs_f64(5.0)));
        assert_eq!(layer.current_time(), Duration::from_secs_f64(2.0));
    }

    #[test]
    fn looping_wraps_around_the_window() {
        let layer = handle();
        layer.set_image(Some(FakeImage { duration: Duration::from_secs_f64(2.0) }));
        layer.set_should_loop(true);
        layer.set_advance_rate(1.0);
        layer.advance_time(Duration::from_secs_f64(2.5));
        assert!(layer.current_time() < Duration::from_secs_f64(2.0));
    }

    #[test]
    fn play_window_clamps_to_source_duration() {
        let layer = handle();
        layer.set_animation_end_time(Duration::from_secs_f64(100.0));
        layer.set_image(Some(FakeImage { duration: Duration::from_secs_f64(3.0) }));
        assert_eq!(layer.0.borrow().clamped_end_time, Duration::from_secs_f64(3.0));
    }

    #[test]
    fn no_animation_registered_without_a_root() {
        let layer = handle();
        layer.set_image(Some(FakeImage { duration: Duration::from_secs_f64(3.0) }));
        layer.set_advance_rate(1.0);
        assert!(!layer.layer().has_animation(ANIMATION_KEY));
    }
}
