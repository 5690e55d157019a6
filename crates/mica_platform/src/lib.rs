//! Host-facing contracts for Mica (spec.md §6): the view transaction the
//! engine drives its embedder with, the gesture input the embedder feeds
//! back in, and the attribute-binding table a view class publishes.
//!
//! This crate ships no concrete implementation beyond in-memory test
//! doubles (`RecordingTransaction`, `RecordingAttributeBinder`) — a real
//! embedder (desktop, Android, iOS) implements these traits against its
//! own view hierarchy.

pub mod binding;
pub mod error;
pub mod gesture;
pub mod view_transaction;

pub use binding::{AttributeBinder, AttributeHandlerDelegate, MeasureDelegate, RecordedBinding, RecordingAttributeBinder};
pub use error::TransactionError;
pub use gesture::{DragEvent, GestureInput, GestureState, WheelEvent};
pub use view_transaction::{AnimatorId, LoadedAsset, RecordingTransaction, SnapshotResult, ViewTransaction};
