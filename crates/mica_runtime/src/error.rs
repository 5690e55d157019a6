//! Runtime-facade errors. Per spec.md §7's closing invariant, nothing from
//! `mica_attributes`/`mica_platform` aborts a frame tick — those errors are
//! logged and degraded inside the scheduler. `RuntimeError` is reserved for
//! genuine facade-boundary failures (a caller misusing `MainThreadManager`
//! from a torn-down runtime), with `anyhow` wrapping anything below that
//! doesn't need its own variant, matching the teacher's `blinc_runtime`
//! convention of `anyhow` at the outermost boundary only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("dispatch was requested but the runtime has already been dropped")]
    RuntimeGone,

    #[error("dispatch_sync called from the main thread would deadlock")]
    SyncDispatchFromMainThread,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
