//! The presentation layer tree.
//!
//! A `Layer` is a presentation node: frame, transform, opacity, clipping,
//! border radius, z-ordering, children, and the animations currently driving
//! it. `ViewNode` is the higher-level logical node that owns a `Layer` plus
//! attribute/scroll/accessibility state (spec.md §3/§4.9.4).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::color::BorderRadius;
use crate::geometry::{Duration, Frame, Point};

/// Text/layout direction. Attribute postprocessing (box-shadow, gradients,
/// border radius) is direction-aware (spec.md §4.9.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

/// 2D affine transform: translate, scale, rotate (about the layer's own
/// origin), applied in that order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation_radians: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_radians: 0.0,
        }
    }
}

/// The result of advancing one animation by one tick (spec.md §4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickResult {
    NotDone,
    Done,
}

/// The polymorphic animation contract shared by time-based, spring-based,
/// image, content-offset, and fling animations (spec.md §4.3, §9 design
/// note: "model as a tagged variant or an interface with virtual dispatch").
///
/// Implementations live in `mica_animation` and `mica_scroll`; `mica_core`
/// only needs the contract to hold animations in a `Layer`'s animation map.
pub trait Animation {
    /// Advance by `delta`. The first call on a freshly-installed animation
    /// must apply ratio 0 without consuming `delta` and return `NotDone`.
    /// Must not itself apply the final-1 state or fire completions — those
    /// only happen when the caller subsequently invokes `complete` (or
    /// `cancel`) in response to a `Done` result.
    fn run(&mut self, layer: &LayerHandle, delta: Duration) -> TickResult;

    /// Apply the final-1 state (if not already applied) and fire
    /// completions with `did_complete = false`.
    fn cancel(&mut self, layer: &LayerHandle);

    /// Apply the final-1 state (if not already applied) and fire
    /// completions with `did_complete = true`.
    fn complete(&mut self, layer: &LayerHandle);

    /// Register a completion callback, fired exactly once from `cancel` or
    /// `complete`, in insertion order.
    fn add_completion(&mut self, callback: Box<dyn FnOnce(bool) + Send>);
}

/// A string key identifying an animation slot on a layer (e.g.
/// `"opacity"`, `"contentOffset"`, the reserved image-animation key).
pub type AnimationKey = String;

/// A presentation node.
///
/// Children are owned by the parent; insertion order is paint order unless
/// `z_index` reorders. Parent/root are weak to avoid reference cycles with
/// children (spec.md §9).
pub struct Layer {
    pub frame: Frame,
    pub bounds_origin: Point,
    pub transform: Transform,
    pub opacity: f64,
    pub clip_to_bounds: bool,
    pub border_radius: BorderRadius,
    pub z_index: i32,
    pub direction: Direction,
    children: Vec<LayerHandle>,
    animations: FxHashMap<AnimationKey, Box<dyn Animation>>,
    parent: Option<Weak<RefCell<Layer>>>,
    root: Option<Weak<RefCell<Layer>>>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            frame: Frame::ZERO,
            bounds_origin: Point::ZERO,
            transform: Transform::default(),
            opacity: 1.0,
            clip_to_bounds: false,
            border_radius: BorderRadius::ZERO,
            z_index: 0,
            direction: Direction::Ltr,
            children: Vec::new(),
            animations: FxHashMap::default(),
            parent: None,
            root: None,
        }
    }
}

/// A shared, interior-mutable handle to a `Layer`. Cloning a handle shares
/// the same underlying node (this is how parent/child and root pointers are
/// modeled without a global arena).
#[derive(Clone)]
pub struct LayerHandle(Rc<RefCell<Layer>>);

impl LayerHandle {
    pub fn new(layer: Layer) -> Self {
        Self(Rc::new(RefCell::new(layer)))
    }

    pub fn downgrade(&self) -> Weak<RefCell<Layer>> {
        Rc::downgrade(&self.0)
    }

    pub fn ptr_eq(&self, other: &LayerHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> std::cell::Ref<'_, Layer> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, Layer> {
        self.0.borrow_mut()
    }

    /// Insert `child` at `index`, reparenting it and propagating this
    /// layer's root pointer (lazily established on first live insertion,
    /// spec.md §3 `ViewNode` invariant).
    pub fn insert_child(&self, index: usize, child: LayerHandle) {
        {
            let mut child_mut = child.borrow_mut();
            child_mut.parent = Some(self.downgrade());
            let root = self.root_handle().unwrap_or_else(|| self.clone());
            child_mut.root = Some(root.downgrade());
        }
        let mut me = self.borrow_mut();
        let index = index.min(me.children.len());
        me.children.insert(index, child);
    }

    pub fn remove_child(&self, child: &LayerHandle) -> Option<LayerHandle> {
        let mut me = self.borrow_mut();
        let pos = me.children.iter().position(|c| c.ptr_eq(child))?;
        let removed = me.children.remove(pos);
        drop(me);
        removed.borrow_mut().parent = None;
        removed.borrow_mut().root = None;
        Some(removed)
    }

    /// Children in paint order: insertion order unless `z_index` differs,
    /// in which case layers are stably sorted by `z_index`.
    pub fn children_in_paint_order(&self) -> Vec<LayerHandle> {
        let me = self.borrow();
        let mut children: Vec<LayerHandle> = me.children.clone();
        drop(me);
        children.sort_by_key(|c| c.borrow().z_index);
        children
    }

    pub fn child_count(&self) -> usize {
        self.borrow().children.len()
    }

    pub fn parent(&self) -> Option<LayerHandle> {
        self.borrow().parent.as_ref().and_then(|w| w.upgrade()).map(LayerHandle)
    }

    pub fn root_handle(&self) -> Option<LayerHandle> {
        self.borrow().root.as_ref().and_then(|w| w.upgrade()).map(LayerHandle)
    }

    /// This layer's frame translated into the coordinate space of its
    /// furthest ancestor, ignoring transforms (used by visibility
    /// computation, spec.md §4.10 step 5).
    pub fn frame_in_root(&self) -> Frame {
        let mut frame = self.borrow().frame;
        let mut current = self.parent();
        while let Some(parent) = current {
            let p = parent.borrow();
            frame = frame.with_offset(p.frame.x - p.bounds_origin.x, p.frame.y - p.bounds_origin.y);
            drop(p);
            current = parent.parent();
        }
        frame
    }

    /// Install an animation under `key`, cancelling and returning any
    /// previous animation under the same key (spec.md §4.3: installing a
    /// new animation on a key that already has one first cancels the old
    /// one, firing its completion with `did_complete = false`).
    pub fn set_animation(&self, key: impl Into<AnimationKey>, animation: Box<dyn Animation>) {
        let key = key.into();
        let previous = self.borrow_mut().animations.insert(key, animation);
        if let Some(mut previous) = previous {
            previous.cancel(self);
        }
    }

    /// Remove and return the animation installed under `key`, if any,
    /// without cancelling or completing it (caller's responsibility).
    pub fn take_animation(&self, key: &str) -> Option<Box<dyn Animation>> {
        self.borrow_mut().animations.remove(key)
    }

    pub fn has_animation(&self, key: &str) -> bool {
        self.borrow().animations.contains_key(key)
    }

    pub fn animation_keys(&self) -> Vec<AnimationKey> {
        self.borrow().animations.keys().cloned().collect()
    }

    /// Advance the animation under `key` by `delta`, removing it from the
    /// map once it reports `Done` and calling `complete` on it as a
    /// separate step (spec.md §4.10 step 2: run, then complete, then fire
    /// completions — three distinct actions, not one).
    pub fn tick_animation(&self, key: &str, delta: Duration) -> Option<TickResult> {
        let mut animation = self.borrow_mut().animations.remove(key)?;
        let result = animation.run(self, delta);
        match result {
            TickResult::Done => animation.complete(self),
            TickResult::NotDone => {
                self.borrow_mut().animations.insert(key.to_string(), animation);
            }
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_child_updates_parent() {
        let parent = LayerHandle::new(Layer::default());
        let child = LayerHandle::new(Layer::default());
        parent.insert_child(0, child.clone());
        assert_eq!(parent.child_count(), 1);
        assert!(child.parent().unwrap().ptr_eq(&parent));

        parent.remove_child(&child);
        assert_eq!(parent.child_count(), 0);
        assert!(child.parent().is_none());
    }

    #[test]
    fn children_paint_order_respects_z_index() {
        let parent = LayerHandle::new(Layer::default());
        let a = LayerHandle::new(Layer::default());
        let b = LayerHandle::new(Layer {
            z_index: -1,
            ..Layer::default()
        });
        parent.insert_child(0, a.clone());
        parent.insert_child(1, b.clone());
        let ordered = parent.children_in_paint_order();
        assert!(ordered[0].ptr_eq(&b));
        assert!(ordered[1].ptr_eq(&a));
    }

    #[test]
    fn root_pointer_propagates_to_descendants() {
        let root = LayerHandle::new(Layer::default());
        let mid = LayerHandle::new(Layer::default());
        let leaf = LayerHandle::new(Layer::default());
        root.insert_child(0, mid.clone());
        mid.insert_child(0, leaf.clone());
        assert!(leaf.root_handle().unwrap().ptr_eq(&root));
    }

    /// Finishes after a fixed number of ticks; records whether `complete`
    /// (as opposed to `run` alone) was the one to fire completions.
    struct StubAnimation {
        ticks_left: u32,
        completed: Rc<RefCell<bool>>,
    }

    impl Animation for StubAnimation {
        fn run(&mut self, _layer: &LayerHandle, _delta: Duration) -> TickResult {
            if self.ticks_left == 0 {
                TickResult::Done
            } else {
                self.ticks_left -= 1;
                TickResult::NotDone
            }
        }

        fn cancel(&mut self, _layer: &LayerHandle) {
            *self.completed.borrow_mut() = true;
        }

        fn complete(&mut self, _layer: &LayerHandle) {
            *self.completed.borrow_mut() = true;
        }

        fn add_completion(&mut self, _callback: Box<dyn FnOnce(bool) + Send>) {}
    }

    #[test]
    fn tick_animation_calls_complete_only_on_done_and_removes_the_key() {
        let layer = LayerHandle::new(Layer::default());
        let completed = Rc::new(RefCell::new(false));
        layer.set_animation(
            "opacity",
            Box::new(StubAnimation {
                ticks_left: 1,
                completed: completed.clone(),
            }),
        );

        let first = layer.tick_animation("opacity", Duration::from_millis(16));
        assert_eq!(first, Some(TickResult::NotDone));
        assert!(!*completed.borrow(), "run() alone must not finalize the animation");
        assert!(layer.has_animation("opacity"));

        let second = layer.tick_animation("opacity", Duration::from_millis(16));
        assert_eq!(second, Some(TickResult::Done));
        assert!(*completed.borrow(), "tick_animation must call complete() once run() reports Done");
        assert!(!layer.has_animation("opacity"));
    }
}
