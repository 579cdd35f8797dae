//! Parallel workload driver.
//!
//! A run has three phases: a seeded prefill, a timed phase where every worker
//! issues its share of random operations against the shared set, and a
//! verification phase that checks the final set against the workers' tallies
//! before destroying it.

use std::thread;
use std::time::{Duration, Instant};

use intset_core::{ConcurrentSet, HandOverHandSet};
use intset_crossbeam::{EpochLazySet, EpochLockFreeSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{Operation, SetKind, WorkloadConfig};
use crate::error::{Result, WorkloadError};

/// Calls issued and calls that returned `true`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpTally {
    pub attempted: usize,
    pub succeeded: usize,
}

impl OpTally {
    fn record(&mut self, succeeded: bool) {
        self.attempted += 1;
        self.succeeded += usize::from(succeeded);
    }

    fn merge(self, other: OpTally) -> OpTally {
        OpTally {
            attempted: self.attempted + other.attempted,
            succeeded: self.succeeded + other.succeeded,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerTally {
    pub adds: OpTally,
    pub removes: OpTally,
    pub finds: OpTally,
}

impl WorkerTally {
    fn merge(self, other: WorkerTally) -> WorkerTally {
        WorkerTally {
            adds: self.adds.merge(other.adds),
            removes: self.removes.merge(other.removes),
            finds: self.finds.merge(other.finds),
        }
    }

    pub fn operations(&self) -> usize {
        self.adds.attempted + self.removes.attempted + self.finds.attempted
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadReport {
    pub set: SetKind,
    pub threads: usize,
    pub elapsed: Duration,
    pub prefilled: usize,
    pub tally: WorkerTally,
    pub final_len: usize,
    pub released: usize,
}

impl WorkloadReport {
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.tally.operations() as f64 / secs
    }
}

/// Run `config` against a freshly created set of the configured kind.
pub fn run(config: &WorkloadConfig) -> Result<WorkloadReport> {
    match config.set {
        SetKind::LockFree => run_with(config, EpochLockFreeSet::new()),
        SetKind::Lazy => run_with(config, EpochLazySet::new()),
        SetKind::HandOverHand => run_with(config, HandOverHandSet::new()),
    }
}

/// Run `config` against `set`, then verify and destroy it.
pub fn run_with<S: ConcurrentSet>(config: &WorkloadConfig, set: S) -> Result<WorkloadReport> {
    config.validate()?;

    let prefilled = prefill(&set, config);
    info!(
        set = config.set.name(),
        prefilled,
        attempts = config.prefill,
        "prefill complete"
    );

    info!(
        threads = config.threads,
        operations = config.operations,
        range = config.range,
        "starting timed phase"
    );
    let start = Instant::now();
    let tally = run_workers(&set, config)?;
    let elapsed = start.elapsed();

    let final_len = verify(&set, prefilled, &tally)?;
    let released = set.destroy();
    if released != final_len {
        return Err(WorkloadError::ReleaseMismatch {
            live: final_len,
            released,
        });
    }

    let report = WorkloadReport {
        set: config.set,
        threads: config.threads,
        elapsed,
        prefilled,
        tally,
        final_len,
        released,
    };
    info!(
        elapsed_ms = report.elapsed.as_millis() as u64,
        ops_per_sec = report.ops_per_sec() as u64,
        adds = report.tally.adds.succeeded,
        removes = report.tally.removes.succeeded,
        finds_hit = report.tally.finds.succeeded,
        final_len,
        released,
        "workload complete"
    );
    Ok(report)
}

fn prefill<S: ConcurrentSet>(set: &S, config: &WorkloadConfig) -> usize {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.prefill)
        .filter(|_| set.add(rng.gen_range(0..config.range)))
        .count()
}

fn run_workers<S: ConcurrentSet>(set: &S, config: &WorkloadConfig) -> Result<WorkerTally> {
    thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|worker| scope.spawn(move || run_worker(set, config, worker)))
            .collect();

        let mut total = WorkerTally::default();
        let mut failure = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(tally) => total = total.merge(tally),
                Err(_) => {
                    failure.get_or_insert(WorkloadError::WorkerPanicked { worker });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(total),
        }
    })
}

fn run_worker<S: ConcurrentSet>(set: &S, config: &WorkloadConfig, worker: usize) -> WorkerTally {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(worker as u64 + 1));
    let mix = config.mix();
    let mut tally = WorkerTally::default();

    for _ in 0..config.operations_for(worker) {
        let value = rng.gen_range(0..config.range);
        match mix.pick(rng.gen_range(0..100)) {
            Operation::Add => tally.adds.record(set.add(value)),
            Operation::Remove => tally.removes.record(set.remove(value)),
            Operation::Find => tally.finds.record(set.find(value)),
        }
    }

    debug!(
        worker,
        adds = tally.adds.succeeded,
        removes = tally.removes.succeeded,
        finds = tally.finds.attempted,
        "worker finished"
    );
    tally
}

fn verify<S: ConcurrentSet>(set: &S, prefilled: usize, tally: &WorkerTally) -> Result<usize> {
    let actual = set.validate()?;
    let expected = (prefilled + tally.adds.succeeded).checked_sub(tally.removes.succeeded);

    match expected {
        Some(expected) if expected == actual => Ok(actual),
        Some(expected) => Err(WorkloadError::LostUpdate { expected, actual }),
        // More removes than values ever present.
        None => Err(WorkloadError::LostUpdate {
            expected: 0,
            actual,
        }),
    }
}
