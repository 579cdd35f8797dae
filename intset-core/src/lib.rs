pub mod common_tests;
pub mod data_structures;
pub mod error;
pub mod guard;

// Re-export the main types for convenience
pub use data_structures::{Bound, ConcurrentSet, HandOverHandSet, LazySet, LockFreeSet, Value};
pub use error::SetError;
pub use guard::{DeferredGuard, Guard};
