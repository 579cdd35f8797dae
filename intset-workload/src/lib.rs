//! Parallel add/remove/find workload for intset collections.
//!
//! ```ignore
//! use intset_workload::{SetKind, WorkloadConfig};
//!
//! let config = WorkloadConfig { set: SetKind::Lazy, ..Default::default() };
//! let report = intset_workload::run(&config)?;
//! println!("{:.0} ops/s", report.ops_per_sec());
//! ```

pub mod config;
pub mod driver;
pub mod error;

pub use config::{Operation, OperationMix, SetKind, WorkloadConfig};
pub use driver::{OpTally, WorkerTally, WorkloadReport, run, run_with};
pub use error::WorkloadError;
