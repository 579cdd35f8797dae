//! Epoch-based guard implementation using crossbeam-epoch.
//!
//! `EpochGuard` is the reclamation strategy for sets running in production:
//!
//! ```text
//! LockFreeSet<EpochGuard> / LazySet<EpochGuard>
//!     │
//!     └── every operation pins the thread; retired nodes are freed once
//!         all threads pinned at retirement time have moved on
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use intset_core::{ConcurrentSet, LockFreeSet};
//! use intset_crossbeam::EpochGuard;
//!
//! let set: LockFreeSet<EpochGuard> = LockFreeSet::new();
//! set.add(42);
//! set.add(17);
//! assert!(set.find(42));
//! set.remove(42);
//! ```

use crossbeam_epoch::{self as epoch, Guard as CrossbeamGuard};
use intset_core::guard::Guard;

/// Epoch-based memory reclamation guard.
///
/// Stateless: retired nodes are handed to the global crossbeam collector, so
/// storing an `EpochGuard` inside a set keeps the set `Send + Sync`.
///
/// Nodes are not freed until every thread has advanced past the epoch in
/// which they were retired. A node retired while a reader is pinned stays
/// valid for that reader until it unpins.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochGuard;

impl EpochGuard {
    pub fn new() -> Self {
        EpochGuard
    }

    /// Push this thread's pending garbage to the global queue and try to
    /// advance the epoch. Used after a workload to speed up reclamation.
    pub fn flush() {
        epoch::pin().flush();
    }
}

impl Guard for EpochGuard {
    type ReadGuard = CrossbeamGuard;

    fn pin() -> Self::ReadGuard {
        epoch::pin()
    }

    unsafe fn defer_destroy<N>(&self, node: *mut N, dealloc: unsafe fn(*mut N)) {
        // Unpins on return; the collector frees the node once every thread
        // pinned before this point has moved on.
        let guard = epoch::pin();
        unsafe {
            guard.defer_unchecked(move || dealloc(node));
        }
    }
}
