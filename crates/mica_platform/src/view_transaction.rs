//! The view transaction: the full contract the engine requires of its
//! host (spec.md §6). Mica never touches a real platform view directly —
//! every mutation is a call into this trait, batched per frame and
//! flushed once at the end of frame-scheduler step 6.

use mica_core::{Frame, Point, Size, PlatformViewId, ViewNodeId};

use crate::error::Result;

/// Opaque handle to a host-managed animator (spring/time/curve config),
/// created by user code and threaded through `ViewTransaction` calls that
/// may animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimatorId(pub u64);

/// A decoded asset ready to be handed to a view (image bytes, a font, ...).
/// Mica never decodes anything itself; the host resolves `src`/asset
/// attributes into this and pushes the result back through the
/// transaction (same "external collaborator via trait" shape as
/// `mica_core::Canvas`).
pub trait LoadedAsset {
    fn byte_len(&self) -> usize;
}

/// Outcome of `snapshotView`: either PNG bytes or a reason it failed.
pub type SnapshotResult = std::result::Result<Vec<u8>, String>;

/// The host-side view mutation interface. All methods are fire-and-forget
/// within a transaction; nothing observably happens until `flush`.
pub trait ViewTransaction {
    /// Associate a backing view with a logical node, first materialization.
    fn move_view_to_tree(&mut self, view: PlatformViewId, node: ViewNodeId);

    /// Insert `child` under `parent` at `index`, optionally animated.
    fn insert_child_view(&mut self, parent: PlatformViewId, child: PlatformViewId, index: usize, animator: Option<AnimatorId>);

    /// Remove `view` from its parent. `clear_node` additionally severs the
    /// node association, as happens when the node itself is torn down
    /// rather than merely re-parented.
    fn remove_view_from_parent(&mut self, view: PlatformViewId, animator: Option<AnimatorId>, clear_node: bool);

    /// Idempotent: calling with the same `frame` twice is a no-op once
    /// flushed. `animator`, if present, interpolates from the view's
    /// current frame rather than snapping.
    fn set_view_frame(&mut self, view: PlatformViewId, frame: Frame, is_rtl: bool, animator: Option<AnimatorId>);

    fn set_view_scroll_specs(&mut self, view: PlatformViewId, content_offset: Point, content_size: Size, animated: bool);

    fn set_view_loaded_asset(&mut self, view: PlatformViewId, asset: Box<dyn LoadedAsset>, draw_flipped: bool);

    fn invalidate_view_layout(&mut self, view: PlatformViewId);

    fn layout_view(&mut self, view: PlatformViewId);

    fn cancel_all_view_animations(&mut self, view: PlatformViewId);

    /// Let the host reclaim `view` for reuse (e.g. a recycler-view cell);
    /// `on_enqueue` runs once the view has actually been released.
    fn will_enqueue_view_to_pool(&mut self, view: PlatformViewId, on_enqueue: Box<dyn FnOnce() + Send>);

    /// Asynchronous: `callback` fires once on the result, success or
    /// failure, never synchronously from within this call.
    fn snapshot_view(&mut self, view: PlatformViewId, callback: Box<dyn FnOnce(SnapshotResult) + Send>);

    /// Commit `animator`'s configured timing/spring against its target,
    /// invoking `completion` with `was_cancelled` once it settles or is
    /// cancelled.
    fn flush_animator(&mut self, animator: AnimatorId, completion: Box<dyn FnOnce(bool) + Send>);

    fn cancel_animator(&mut self, animator: AnimatorId);

    /// Run `f` on whichever thread the host considers safe for
    /// non-main-thread-safe calls (e.g. a platform's UI thread).
    fn execute_in_transaction_thread(&mut self, f: Box<dyn FnOnce() + Send>);

    /// Commit all batched operations above. `sync` mirrors spec.md's
    /// `flush(sync?)`: when true, this call blocks until the transaction
    /// thread has applied everything queued so far.
    fn flush(&mut self, sync: bool) -> Result<()>;
}

/// An in-memory test double: records every call instead of touching any
/// real platform view. `flush` always succeeds synchronously. Mirrors the
/// teacher's `NativeBridgeState` recording pattern.
#[derive(Default)]
pub struct RecordingTransaction {
    pub calls: Vec<String>,
}

impl RecordingTransaction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewTransaction for RecordingTransaction {
    fn move_view_to_tree(&mut self, view: PlatformViewId, node: ViewNodeId) {
        self.calls.push(format!("moveViewToTree({view:?}, {node:?})"));
    }

    fn insert_child_view(&mut self, parent: PlatformViewId, child: PlatformViewId, index: usize, animator: Option<AnimatorId>) {
        self.calls.push(format!("insertChildView({parent:?}, {child:?}, {index}, {animator:?})"));
    }

    fn remove_view_from_parent(&mut self, view: PlatformViewId, animator: Option<AnimatorId>, clear_node: bool) {
        self.calls.push(format!("removeViewFromParent({view:?}, {animator:?}, clear_node={clear_node})"));
    }

    fn set_view_frame(&mut self, view: PlatformViewId, frame: Frame, is_rtl: bool, animator: Option<AnimatorId>) {
        self.calls.push(format!("setViewFrame({view:?}, {frame:?}, rtl={is_rtl}, {animator:?})"));
    }

    fn set_view_scroll_specs(&mut self, view: PlatformViewId, content_offset: Point, content_size: Size, animated: bool) {
        self.calls.push(format!("setViewScrollSpecs({view:?}, {content_offset:?}, {content_size:?}, animated={animated})"));
    }

    fn set_view_loaded_asset(&mut self, view: PlatformViewId, asset: Box<dyn LoadedAsset>, draw_flipped: bool) {
        self.calls.push(format!("setViewLoadedAsset({view:?}, {} bytes, flipped={draw_flipped})", asset.byte_len()));
    }

    fn invalidate_view_layout(&mut self, view: PlatformViewId) {
        self.calls.push(format!("invalidateViewLayout({view:?})"));
    }

    fn layout_view(&mut self, view: PlatformViewId) {
        self.calls.push(format!("layoutView({view:?})"));
    }

    fn cancel_all_view_animations(&mut self, view: PlatformViewId) {
        self.calls.push(format!("cancelAllViewAnimations({view:?})"));
    }

    fn will_enqueue_view_to_pool(&mut self, view: PlatformViewId, on_enqueue: Box<dyn FnOnce() + Send>) {
        self.calls.push(format!("willEnqueueViewToPool({view:?})"));
        on_enqueue();
    }

    fn snapshot_view(&mut self, view: PlatformViewId, callback: Box<dyn FnOnce(SnapshotResult) + Send>) {
        self.calls.push(format!("snapshotView({view:?})"));
        callback(Ok(Vec::new()));
    }

    fn flush_animator(&mut self, animator: AnimatorId, completion: Box<dyn FnOnce(bool) + Send>) {
        self.calls.push(format!("flushAnimator({animator:?})"));
        completion(false);
    }

    fn cancel_animator(&mut self, animator: AnimatorId) {
        self.calls.push(format!("cancelAnimator({animator:?})"));
    }

    fn execute_in_transaction_thread(&mut self, f: Box<dyn FnOnce() + Send>) {
        f();
    }

    fn flush(&mut self, sync: bool) -> Result<()> {
        self.calls.push(format!("flush(sync={sync})"));
        Ok(())
    }
}
