//! Crossbeam-based memory reclamation for intset collections.
//!
//! This crate provides `EpochGuard`, an implementation of the `Guard` trait
//! using crossbeam-epoch.
//!
//! # Usage
//!
//! ```ignore
//! use intset_core::{ConcurrentSet, LazySet};
//! use intset_crossbeam::EpochGuard;
//!
//! let set: LazySet<EpochGuard> = LazySet::new();
//! set.add(42);
//! ```

pub mod epoch_guard;

pub use epoch_guard::EpochGuard;

use intset_core::{LazySet, LockFreeSet};

/// Lock-free set with epoch-based reclamation.
pub type EpochLockFreeSet = LockFreeSet<EpochGuard>;

/// Lazy set with epoch-based reclamation.
pub type EpochLazySet = LazySet<EpochGuard>;
