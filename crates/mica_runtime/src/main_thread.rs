//! Single-threaded cooperative scheduling (spec.md §5): a designated main
//! thread on which all scheduling, layout, animation ticking, attribute
//! application, and view mutation occur; other threads enqueue work onto
//! it through `MainThreadManager`.
//!
//! Grounded in `blinc_animation::scheduler::SchedulerHandle`'s
//! weak-handle-into-a-mutex pattern: the manager owns the queue behind an
//! `Arc<Mutex<_>>`, and every handle holds only a `Weak` reference so
//! dispatching after the runtime is gone is a no-op rather than a leak.

use std::cell::Cell;
use std::sync::{Arc, Mutex, Weak};

use crate::error::{Result, RuntimeError};

type Dispatched = Box<dyn FnOnce() + Send>;

thread_local! {
    /// Set exactly once, by whichever thread constructs the
    /// `MainThreadManager` that owns this runtime instance.
    static IS_MAIN_THREAD: Cell<bool> = const { Cell::new(false) };
}

/// Returns whether the calling thread is the runtime's main thread. Only
/// meaningful after a `MainThreadManager` has been constructed on it.
pub fn current_thread_is_main_thread() -> bool {
    IS_MAIN_THREAD.with(|flag| flag.get())
}

#[derive(Default)]
struct Inner {
    queue: Vec<Dispatched>,
}

/// Owns the dispatch queue. Constructing one marks the calling thread as
/// the main thread for the remainder of the process (or until another
/// `MainThreadManager` is constructed elsewhere, which is a misuse the
/// original also doesn't guard against).
pub struct MainThreadManager {
    inner: Arc<Mutex<Inner>>,
}

impl MainThreadManager {
    pub fn new() -> Self {
        IS_MAIN_THREAD.with(|flag| flag.set(true));
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// A weak handle other threads use to enqueue work. Never keeps this
    /// manager alive.
    pub fn handle(&self) -> MainThreadHandle {
        MainThreadHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Run every queued closure, in enqueue order, on the calling (main)
    /// thread. Called once per frame tick, before any other scheduler step,
    /// so dispatched work can influence layout/animation for that frame.
    pub fn drain(&self) {
        let queued = std::mem::take(&mut self.inner.lock().unwrap().queue);
        for job in queued {
            job();
        }
    }
}

impl Default for MainThreadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak, cloneable reference to a `MainThreadManager`'s queue.
#[derive(Clone)]
pub struct MainThreadHandle {
    inner: Weak<Mutex<Inner>>,
}

impl MainThreadHandle {
    /// Enqueue `job` to run on the main thread at the next `drain`. Silently
    /// dropped if the owning `MainThreadManager` no longer exists.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        if current_thread_is_main_thread() {
            job();
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().queue.push(Box::new(job));
        }
    }

    /// Like `dispatch`, but returns an error instead of silently dropping
    /// work when the runtime is already gone — for callers that need to
    /// know dispatch didn't happen.
    pub fn try_dispatch(&self, job: impl FnOnce() + Send + 'static) -> Result<()> {
        if current_thread_is_main_thread() {
            job();
            return Ok(());
        }
        let inner = self.inner.upgrade().ok_or(RuntimeError::RuntimeGone)?;
        inner.lock().unwrap().queue.push(Box::new(job));
        Ok(())
    }
}
