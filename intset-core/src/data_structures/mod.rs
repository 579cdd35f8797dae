//! Concurrent sorted integer sets.
//!
//! # Organization
//!
//! - [`sets`] - The set implementations (LockFreeSet, LazySet, HandOverHandSet)
//! - [`concurrent_set`] - The `ConcurrentSet` trait they share
//! - [`internal`] - Sentinel keys and marked pointers

pub mod concurrent_set;
pub(crate) mod internal;
pub mod sets;

pub use concurrent_set::ConcurrentSet;
pub use internal::{Bound, Value};
pub use sets::{HandOverHandSet, LazySet, LockFreeSet};

pub(crate) use internal::MarkedPtr;
