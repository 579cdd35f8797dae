//! Guard trait for memory reclamation strategies.
//!
//! Sets that let readers traverse without locks cannot free an unlinked node
//! right away: another thread may still be standing on it. The `Guard` trait
//! abstracts over how such nodes are retired and eventually freed.
//!
//! # Design
//!
//! ```text
//! LockFreeSet<G: Guard> / LazySet<G: Guard>
//!     │
//!     ├── LockFreeSet<EpochGuard>      (production, intset-crossbeam)
//!     └── LockFreeSet<DeferredGuard>   (testing)
//! ```
//!
//! `HandOverHandSet` frees nodes under its own locks and is not parameterized
//! by a guard.
//!
//! # Example
//!
//! ```rust,ignore
//! use intset_core::{ConcurrentSet, DeferredGuard, LockFreeSet};
//! use intset_crossbeam::EpochGuard;
//!
//! // Production: epoch-based reclamation
//! let set: LockFreeSet<EpochGuard> = LockFreeSet::new();
//! set.add(42);
//!
//! // Testing: deferred destruction
//! let test_set: LockFreeSet<DeferredGuard> = LockFreeSet::new();
//! ```

mod deferred_guard;

pub use deferred_guard::DeferredGuard;

/// A memory reclamation guard that protects concurrent access to nodes.
///
/// # Safety Contract
///
/// Implementations must ensure that nodes passed to `defer_destroy` are not
/// freed while any thread holding a `ReadGuard` pinned before the node was
/// retired can still reach it.
///
/// Guards are stored in sets and must be `Send + Sync`. Pinning happens per
/// operation, not when the stored guard is created.
///
pub trait Guard: Sized + Default + Send + Sync {
    /// An active guard that protects reads for its lifetime.
    ///
    /// For epoch-based guards this holds a pinned `crossbeam_epoch::Guard`.
    /// For deferred guards it is `()`, since nothing is freed before the
    /// owning set drops.
    ///
    type ReadGuard: Sized;

    /// Pin an active read guard for the duration of one set operation.
    fn pin() -> Self::ReadGuard;

    /// Schedule a node for deferred destruction.
    ///
    /// # Safety
    ///
    /// - `node` must be a valid pointer previously allocated by the set
    /// - `node` must already be unlinked (unreachable by new traversals)
    /// - `node` must be retired at most once
    /// - `dealloc` must be the correct deallocation function for `node`
    ///
    unsafe fn defer_destroy<N>(&self, node: *mut N, dealloc: unsafe fn(*mut N));
}
