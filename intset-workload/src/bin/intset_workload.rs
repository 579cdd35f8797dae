//! intset-workload: time a parallel random workload against one set.
//!
//! # Usage
//!
//! ```bash
//! intset-workload --set lazy --threads 8 --operations 1000000 --range 1000
//! RUST_LOG=debug intset-workload --set hand-over-hand
//! ```

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use intset_workload::WorkloadConfig;

/// Run a seeded add/remove/find workload and verify the set afterwards.
#[derive(Parser, Debug)]
#[command(name = "intset-workload")]
#[command(about = "Parallel workload driver for concurrent sorted integer sets")]
struct Cli {
    #[command(flatten)]
    workload: WorkloadConfig,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_thread_names(true)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let report = intset_workload::run(&cli.workload)
        .with_context(|| format!("{} workload failed", cli.workload.set.name()))?;

    println!(
        "{}: {} threads, {} ops in {:.3}s ({:.0} ops/s), final size {}",
        report.set.name(),
        report.threads,
        report.tally.operations(),
        report.elapsed.as_secs_f64(),
        report.ops_per_sec(),
        report.final_len,
    );
    Ok(())
}
