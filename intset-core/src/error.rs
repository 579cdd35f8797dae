use thiserror::Error;

use crate::data_structures::Value;

/// Structural invariant violations detected by [`ConcurrentSet::validate`].
///
/// [`ConcurrentSet::validate`]: crate::data_structures::ConcurrentSet::validate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("list out of order: {previous} is followed by {next}")]
    OutOfOrder { previous: Value, next: Value },

    #[error("value {value} is stored more than once")]
    Duplicate { value: Value },
}
