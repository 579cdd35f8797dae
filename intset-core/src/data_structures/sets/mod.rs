//! Concurrent sorted set implementations.
//!
//! Guarded sets are parameterized by `G: Guard`, which decides how unlinked
//! nodes are reclaimed:
//!
//! - `DeferredGuard`: Testing - defers destruction until the set drops
//! - `EpochGuard`: Production - epoch-based reclamation (crossbeam-epoch)

pub mod hand_over_hand_set;
pub mod lazy_set;
pub mod lock_free_set;

pub use hand_over_hand_set::HandOverHandSet;
pub use lazy_set::LazySet;
pub use lock_free_set::LockFreeSet;
