//! Workload configuration.
//!
//! `WorkloadConfig` derives `clap::Args` so the binary can flatten it straight
//! into its command line, while tests build it through `Default`.

use std::num::NonZeroUsize;
use std::thread;

use clap::{Args, ValueEnum};
use intset_core::Value;

use crate::error::{Result, WorkloadError};

/// Which set implementation a workload runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SetKind {
    /// Harris-Michael lock-free list with epoch reclamation
    #[default]
    LockFree,
    /// Optimistic lazy list with epoch reclamation
    Lazy,
    /// Lock coupling, nodes freed under lock
    HandOverHand,
}

impl SetKind {
    pub fn name(&self) -> &'static str {
        match self {
            SetKind::LockFree => "lock-free",
            SetKind::Lazy => "lazy",
            SetKind::HandOverHand => "hand-over-hand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Find,
}

/// Percentages of add and remove calls; find takes the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMix {
    pub add_percent: u8,
    pub remove_percent: u8,
}

impl OperationMix {
    pub fn new(add_percent: u8, remove_percent: u8) -> Result<Self> {
        let mix = OperationMix {
            add_percent,
            remove_percent,
        };
        mix.validate()?;
        Ok(mix)
    }

    pub fn find_percent(&self) -> u8 {
        100u8.saturating_sub(self.add_percent.saturating_add(self.remove_percent))
    }

    /// Map a roll in `0..100` to an operation.
    pub fn pick(&self, roll: u8) -> Operation {
        if roll < self.add_percent {
            Operation::Add
        } else if roll - self.add_percent < self.remove_percent {
            Operation::Remove
        } else {
            Operation::Find
        }
    }

    fn validate(&self) -> Result<()> {
        let total = u16::from(self.add_percent) + u16::from(self.remove_percent);
        if total > 100 {
            return Err(WorkloadError::InvalidConfig(format!(
                "add ({}%) and remove ({}%) exceed 100%",
                self.add_percent, self.remove_percent
            )));
        }
        Ok(())
    }
}

impl Default for OperationMix {
    fn default() -> Self {
        OperationMix {
            add_percent: 25,
            remove_percent: 25,
        }
    }
}

pub fn default_threads() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

/// Parameters of one parallel add/remove/find run.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct WorkloadConfig {
    /// Number of worker threads.
    #[arg(long, env = "INTSET_THREADS", default_value_t = default_threads())]
    pub threads: usize,

    /// Total operations, split evenly across workers.
    #[arg(long, default_value_t = 100_000)]
    pub operations: usize,

    /// Values are drawn uniformly from `0..range`.
    #[arg(long, default_value_t = 1_000)]
    pub range: Value,

    /// Random add calls issued before the timed phase.
    #[arg(long, default_value_t = 1_000)]
    pub prefill: usize,

    /// Base RNG seed. Worker `i` uses `seed + i + 1`, prefill uses `seed`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Percentage of add calls.
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub add_percent: u8,

    /// Percentage of remove calls.
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub remove_percent: u8,

    /// Set implementation to exercise.
    #[arg(long, value_enum, default_value_t = SetKind::LockFree)]
    pub set: SetKind,
}

impl WorkloadConfig {
    pub fn mix(&self) -> OperationMix {
        OperationMix {
            add_percent: self.add_percent,
            remove_percent: self.remove_percent,
        }
    }

    /// Operations assigned to `worker`; the remainder goes to the lowest ids.
    pub fn operations_for(&self, worker: usize) -> usize {
        let base = self.operations / self.threads;
        base + usize::from(worker < self.operations % self.threads)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(WorkloadError::InvalidConfig(
                "at least one worker thread is required".to_string(),
            ));
        }
        if self.range <= 0 {
            return Err(WorkloadError::InvalidConfig(format!(
                "value range must be positive, got {}",
                self.range
            )));
        }
        self.mix().validate()
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        let mix = OperationMix::default();
        WorkloadConfig {
            threads: default_threads(),
            operations: 100_000,
            range: 1_000,
            prefill: 1_000,
            seed: 42,
            add_percent: mix.add_percent,
            remove_percent: mix.remove_percent,
            set: SetKind::default(),
        }
    }
}
