//! Errors a `ViewTransaction` host can report back to the engine
//! (spec.md §7's "view transaction dispatch failure" kind).

use thiserror::Error;

/// Reported asynchronously to the originating node via
/// `notifyAttributeFailed`-style callbacks; never propagated out of a
/// frame tick.
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("failed to dispatch view for node {node:?}: {message}")]
    DispatchFailed { node: mica_core::ViewNodeId, message: String },

    #[error("snapshot of view {view:?} failed: {message}")]
    SnapshotFailed { view: mica_core::PlatformViewId, message: String },

    #[error("transaction flush failed: {0}")]
    FlushFailed(String),
}

pub type Result<T> = std::result::Result<T, TransactionError>;
