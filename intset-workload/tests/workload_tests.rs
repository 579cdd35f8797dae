use intset_core::{DeferredGuard, LazySet, LockFreeSet};
use intset_workload::{SetKind, WorkloadConfig, WorkloadError, run, run_with};
use rstest::rstest;
use serial_test::serial;

fn config(set: SetKind) -> WorkloadConfig {
    WorkloadConfig {
        threads: 8,
        operations: 80_000,
        range: 1_000,
        prefill: 1_000,
        seed: 7,
        set,
        ..Default::default()
    }
}

#[rstest]
#[serial]
#[case::lock_free(SetKind::LockFree)]
#[case::lazy(SetKind::Lazy)]
#[case::hand_over_hand(SetKind::HandOverHand)]
fn test_run_verifies_and_releases(#[case] set: SetKind) {
    let report = run(&config(set)).expect("workload failed");

    assert_eq!(report.set, set);
    assert_eq!(report.tally.operations(), 80_000);
    assert_eq!(report.released, report.final_len);
    assert_eq!(
        report.prefilled + report.tally.adds.succeeded - report.tally.removes.succeeded,
        report.final_len
    );
    assert!(report.final_len <= 1_000);
}

#[rstest]
#[serial]
#[case::write_heavy(90, 10)]
#[case::remove_heavy(10, 90)]
#[case::read_only(0, 0)]
fn test_run_with_any_mix(#[case] add_percent: u8, #[case] remove_percent: u8) {
    let config = WorkloadConfig {
        add_percent,
        remove_percent,
        ..config(SetKind::LockFree)
    };
    let report = run(&config).expect("workload failed");

    assert_eq!(report.tally.operations(), 80_000);
    if add_percent == 0 && remove_percent == 0 {
        assert_eq!(report.final_len, report.prefilled);
    }
}

#[test]
#[serial]
fn test_run_with_deferred_guard() {
    let report = run_with(&config(SetKind::LockFree), LockFreeSet::<DeferredGuard>::new())
        .expect("workload failed");
    assert_eq!(report.released, report.final_len);

    let report = run_with(&config(SetKind::Lazy), LazySet::<DeferredGuard>::new())
        .expect("workload failed");
    assert_eq!(report.released, report.final_len);
}

#[test]
fn test_single_thread_run_is_reproducible() {
    let config = WorkloadConfig {
        threads: 1,
        ..config(SetKind::HandOverHand)
    };

    let first = run(&config).expect("workload failed");
    let second = run(&config).expect("workload failed");

    assert_eq!(first.tally, second.tally);
    assert_eq!(first.final_len, second.final_len);
}

#[test]
fn test_invalid_mix_is_rejected() {
    let config = WorkloadConfig {
        add_percent: 80,
        remove_percent: 80,
        ..config(SetKind::Lazy)
    };

    let err = run(&config).unwrap_err();
    assert!(matches!(err, WorkloadError::InvalidConfig(_)));
    assert!(err.to_string().contains("exceed 100%"));
}
