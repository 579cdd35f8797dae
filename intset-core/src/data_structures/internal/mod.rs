//! Internal implementation details.
//!
//! `MarkedPtr` is pub(crate). `Bound` and `Value` are re-exported because
//! node keys show up in public diagnostics.

pub mod bound;
pub mod marked_ptr;

pub use bound::{Bound, Value};
pub(crate) use marked_ptr::MarkedPtr;
