//! Crate-local error types, following `blinc_core::native_bridge`'s use of
//! `thiserror` for every fallible boundary.

use thiserror::Error;

use crate::view_node::ViewNodeId;

/// Errors raised by `ViewTree`/`ViewNode` operations that take an id rather
/// than a handle (the attribute pipeline addresses nodes by
/// `ViewNodeId`, so a stale id is a recoverable error, not a panic).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no view node with id {0:?}")]
    UnknownViewNode(ViewNodeId),

    #[error("view node {0:?} already has a platform view attached")]
    PlatformViewAlreadyAttached(ViewNodeId),
}
