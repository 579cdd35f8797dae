use crate::data_structures::Value;
use crate::error::SetError;

/// A set of integers that many threads may mutate at the same time.
///
/// # Design
///
/// Implementations keep their values in a singly linked list bounded by a
/// head and a tail sentinel, in strictly descending order. They differ in
/// how they synchronize the read-then-link step:
///
/// ```text
/// LockFreeSet<G>      - CAS on marked next pointers, guard-deferred reclamation
/// LazySet<G>          - optimistic traversal, validated per-node locks
/// HandOverHandSet     - lock coupling, immediate reclamation under lock
/// ```
///
/// `add`, `remove` and `find` are linearizable. The snapshot-based helpers
/// (`to_vec`, `len`, `is_empty`, `validate`) are exact only at quiescence.
///
pub trait ConcurrentSet: Send + Sync {
    /// Insert `value`.
    ///
    /// Returns `true` if the value was added, `false` if it was already present.
    ///
    fn add(&self, value: Value) -> bool;

    /// Remove `value`.
    ///
    /// Returns `true` if the value was removed, `false` if it was not present.
    ///
    fn remove(&self, value: Value) -> bool;

    /// Check whether `value` is present.
    fn find(&self, value: Value) -> bool;

    /// Collect the live values in list order (descending).
    fn to_vec(&self) -> Vec<Value>;

    /// Tear the set down, freeing every node including both sentinels.
    ///
    /// Returns the number of live values that were released. Taking `self`
    /// by value rules out operations racing with the teardown.
    ///
    fn destroy(self) -> usize
    where
        Self: Sized;

    // =========================================================================
    // Provided operations
    // =========================================================================

    /// Number of live values.
    fn len(&self) -> usize {
        self.to_vec().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add every value from `values`.
    ///
    /// Returns the number of values that were not already present.
    ///
    fn add_batch<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = Value>,
        Self: Sized,
    {
        values.into_iter().filter(|v| self.add(*v)).count()
    }

    /// Check the order and uniqueness invariants over a snapshot.
    ///
    /// Returns the number of live values. Only meaningful at quiescence.
    ///
    fn validate(&self) -> Result<usize, SetError> {
        let values = self.to_vec();

        for pair in values.windows(2) {
            let (previous, next) = (pair[0], pair[1]);
            if previous == next {
                return Err(SetError::Duplicate { value: next });
            }
            if previous < next {
                return Err(SetError::OutOfOrder { previous, next });
            }
        }

        Ok(values.len())
    }
}
