//! Crate-local errors for the attribute pipeline, following
//! `mica_core::error::CoreError`'s use of `thiserror`.
//!
//! Per the closing invariant of spec.md §7: no variant here is ever allowed
//! to abort a frame tick. Callers log and degrade (keep the prior resolved
//! value, reset a composite, fall back to a default view class) instead of
//! propagating out of the pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("attribute {attribute:?} on {class}: failed to parse {raw:?}: {message}")]
    ParseFailure { class: String, attribute: String, raw: String, message: String },

    #[error("attribute {attribute:?} on {class}: expected {expected}, got a value of a different type")]
    TypeMismatch { class: String, attribute: String, expected: &'static str },

    #[error("composite {composite:?}: required part {part:?} is invalid")]
    MissingRequiredCompositePart { composite: String, part: String },

    #[error("unknown view class {0:?}, falling back to default")]
    UnknownViewClass(String),

    #[error("unknown attribute {0:?}, mutation dropped")]
    UnknownAttribute(String),

    #[error("view transaction dispatch failed for attribute {attribute:?}: {message}")]
    ViewTransactionDispatchFailure { attribute: String, message: String },
}
