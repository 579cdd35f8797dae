use intset_core::SetError;
use thiserror::Error;

/// Failures reported by a workload run.
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("invalid workload configuration: {0}")]
    InvalidConfig(String),

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    /// The final size disagrees with prefill + successful adds - successful removes.
    #[error("lost update: expected {expected} live values, found {actual}")]
    LostUpdate { expected: usize, actual: usize },

    #[error("destroy released {released} values but {live} were live")]
    ReleaseMismatch { live: usize, released: usize },

    #[error("set invariant violated: {0}")]
    Invariant(#[from] SetError),
}

pub type Result<T> = std::result::Result<T, WorkloadError>;
