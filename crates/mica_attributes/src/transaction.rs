//! Batches attribute applications within a frame tick so a host-side view
//! mutation backend sees one coalesced commit instead of one call per
//! attribute. Distinct from, and deliberately independent of, the host's
//! own view-mutation interface (that lives in `mica_platform`) — this scope
//! only orders and seals *this crate's* pending applications.

use std::cell::RefCell;

use crate::error::AttributeError;
use crate::ids::AttributeId;
use crate::value::AttributeValue;

/// One pending mutation queued by `applyAttribute`/`resetAttribute`
/// (spec.md §4.9.3 step 5).
#[derive(Clone, Debug, PartialEq)]
pub enum PendingApplication {
    Apply { attribute: AttributeId, value: AttributeValue },
    Reset { attribute: AttributeId },
}

/// Batches applications for one node (or subtree during a nested measure
/// pass) until `flush` commits them. `submit()` seals a sub-transaction so
/// a nested measure pass's speculative applications never leak into the
/// outer scope if the pass is discarded.
#[derive(Default)]
pub struct ViewTransactionScope {
    pending: RefCell<Vec<PendingApplication>>,
    sealed: RefCell<bool>,
}

impl ViewTransactionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_apply(&self, attribute: AttributeId, value: AttributeValue) {
        if *self.sealed.borrow() {
            return;
        }
        self.pending.borrow_mut().push(PendingApplication::Apply { attribute, value });
    }

    pub fn queue_reset(&self, attribute: AttributeId) {
        if *self.sealed.borrow() {
            return;
        }
        self.pending.borrow_mut().push(PendingApplication::Reset { attribute });
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Commit all queued applications in order via `apply`, which performs
    /// the actual dispatch (to a view-transaction host interface, once
    /// `mica_platform` exists, or a test double in the meantime). `sync`
    /// mirrors spec.md's `flush(sync?)`: synchronous flushes return only
    /// once `apply` has run for every entry, matching this function's
    /// current (always synchronous) behavior; the flag is threaded through
    /// so a future async host backend can honor it.
    ///
    /// One entry failing never stops the rest from applying — per spec.md
    /// §7's closing invariant, no error kind is allowed to abort the frame
    /// tick. Failures are logged and returned so the caller can decide what,
    /// if anything, to do about a partially-applied transaction.
    pub fn flush<F>(&self, _sync: bool, mut apply: F) -> Vec<AttributeError>
    where
        F: FnMut(&PendingApplication) -> Result<(), AttributeError>,
    {
        let pending = self.pending.borrow_mut().split_off(0);
        let mut failures = Vec::new();
        for entry in &pending {
            if let Err(error) = apply(entry) {
                tracing::warn!(%error, "attribute application failed, continuing with the rest of the transaction");
                failures.push(error);
            }
        }
        failures
    }

    /// Seal this scope: further `queue_apply`/`queue_reset` calls are
    /// silently dropped. Used when a nested measure pass's scope is
    /// discarded rather than flushed.
    pub fn submit(&self) {
        *self.sealed.borrow_mut() = true;
    }

    pub fn is_sealed(&self) -> bool {
        *self.sealed.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AttributeIds;

    #[test]
    fn flush_commits_in_order_and_drains_the_queue() {
        let scope = ViewTransactionScope::new();
        let ids = AttributeIds::new();
        let opacity = ids.id_for_name("opacity");
        let enabled = ids.id_for_name("enabled");
        scope.queue_apply(opacity, AttributeValue::Double(0.5));
        scope.queue_apply(enabled, AttributeValue::Bool(true));

        let mut seen = Vec::new();
        let failures = scope.flush(true, |entry| {
            seen.push(entry.clone());
            Ok(())
        });

        assert!(failures.is_empty());
        assert_eq!(seen.len(), 2);
        assert_eq!(scope.pending_count(), 0);
    }

    #[test]
    fn sealed_scope_drops_further_queued_entries() {
        let scope = ViewTransactionScope::new();
        let ids = AttributeIds::new();
        let opacity = ids.id_for_name("opacity");
        scope.submit();
        scope.queue_apply(opacity, AttributeValue::Double(1.0));
        assert_eq!(scope.pending_count(), 0);
    }

    #[test]
    fn flush_keeps_applying_remaining_entries_after_an_error() {
        let scope = ViewTransactionScope::new();
        let ids = AttributeIds::new();
        let a = ids.id_for_name("a");
        let b = ids.id_for_name("b");
        let c = ids.id_for_name("c");
        scope.queue_apply(a, AttributeValue::Null);
        scope.queue_apply(b, AttributeValue::Null);
        scope.queue_apply(c, AttributeValue::Null);

        let mut calls = 0;
        let failures = scope.flush(true, |entry| {
            calls += 1;
            match entry {
                PendingApplication::Apply { attribute, .. } if *attribute == b => {
                    Err(AttributeError::UnknownAttribute("b".into()))
                }
                _ => Ok(()),
            }
        });

        assert_eq!(calls, 3, "every queued entry is attempted, not just the ones before the first error");
        assert_eq!(failures.len(), 1);
        assert_eq!(scope.pending_count(), 0);
    }
}
