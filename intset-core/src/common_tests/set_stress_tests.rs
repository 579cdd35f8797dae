//! Common stress tests for ConcurrentSet implementations.
//!
//! These tests verify concurrent correctness under high contention.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use crate::data_structures::{ConcurrentSet, Value};

/// Test concurrent find operations during modifications
pub fn test_find_during_modifications<C>()
where
    C: ConcurrentSet + Default + 'static,
{
    let set = Arc::new(C::default());
    let stop_flag = Arc::new(AtomicBool::new(false));
    let find_stable = Arc::new(AtomicUsize::new(0));

    // Even values are never touched by the modifiers.
    for i in 0..1000 {
        set.add(i * 2);
    }

    let mut handles = vec![];

    // Modifier threads work on odd values only
    for t in 0..4 {
        let set = Arc::clone(&set);
        let stop = Arc::clone(&stop_flag);
        handles.push(thread::spawn(move || {
            let mut i: Value = 0;
            while !stop.load(Ordering::Relaxed) {
                let value = ((t * 10_000 + i) % 2000) | 1;
                if i % 2 == 0 {
                    set.add(value);
                } else {
                    set.remove(value);
                }
                i += 1;
            }
        }));
    }

    // Finder threads must always see every even value
    for _ in 0..4 {
        let set = Arc::clone(&set);
        let stop = Arc::clone(&stop_flag);
        let stable = Arc::clone(&find_stable);
        handles.push(thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                for i in 0..1000 {
                    assert!(set.find(i * 2), "stable value {} vanished", i * 2);
                    stable.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    thread::sleep(Duration::from_millis(500));
    stop_flag.store(true, Ordering::Relaxed);

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(set.validate().is_ok());
    println!("Stable finds: {}", find_stable.load(Ordering::Relaxed));
}

/// Test memory ordering between producer and consumer
pub fn test_memory_ordering<C>()
where
    C: ConcurrentSet + Default + 'static,
{
    let set = Arc::new(C::default());
    let data = Arc::new(AtomicUsize::new(0));
    let flag = Arc::new(AtomicBool::new(false));

    let set1 = Arc::clone(&set);
    let data1 = Arc::clone(&data);
    let flag1 = Arc::clone(&flag);

    let producer = thread::spawn(move || {
        data1.store(42, Ordering::Release);
        set1.add(100);
        flag1.store(true, Ordering::Release);
    });

    let consumer = thread::spawn(move || {
        while !flag.load(Ordering::Acquire) {
            thread::yield_now();
        }
        assert!(set.find(100));
        assert_eq!(data.load(Ordering::Acquire), 42);
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

/// Test concurrent remove of the same value - exactly one should succeed
pub fn test_concurrent_remove_same_value<C>()
where
    C: ConcurrentSet + Default + 'static,
{
    let set = Arc::new(C::default());
    let num_threads = 32;
    let test_value = 42;

    set.add_batch([41, 42, 43]);

    let success_count = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let set = Arc::clone(&set);
            let success = Arc::clone(&success_count);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                if set.remove(test_value) {
                    success.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        success_count.load(Ordering::Relaxed),
        1,
        "Exactly one thread should successfully remove the value"
    );
    assert!(!set.find(test_value), "Value should be gone");
    assert_eq!(set.to_vec(), vec![43, 41]);
}

/// Test linearizability - each thread's own value behaves like a private set
pub fn test_linearizability<C>()
where
    C: ConcurrentSet + Default + 'static,
{
    let set = Arc::new(C::default());
    let num_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let num_ops = 5000;

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let set = Arc::clone(&set);
            thread::spawn(move || {
                for i in 0..num_ops {
                    let value = (t * num_ops + i) as Value;

                    // Add must return true for a new value
                    assert!(set.add(value), "Failed to add unique value {}", value);

                    // Immediately after add, must be findable
                    assert!(set.find(value), "Value {} not found after add", value);

                    // Remove must succeed for an existing value
                    assert!(set.remove(value), "Failed to remove value {}", value);

                    // After remove, must not be findable
                    assert!(!set.find(value), "Value {} found after remove", value);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(set.is_empty());
}

/// Successful adds and removes of a single value must strictly alternate
pub fn test_extreme_contention_single_value<C>()
where
    C: ConcurrentSet + Default + 'static,
{
    let set = Arc::new(C::default());
    let num_threads = 16;
    let ops_per_thread = 2000;
    let the_value = 42;

    let successful_adds = Arc::new(AtomicUsize::new(0));
    let successful_removes = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let set = Arc::clone(&set);
            let adds = Arc::clone(&successful_adds);
            let removes = Arc::clone(&successful_removes);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();

                for i in 0..ops_per_thread {
                    if i % 2 == 0 {
                        if set.add(the_value) {
                            adds.fetch_add(1, Ordering::Relaxed);
                        }
                    } else if set.remove(the_value) {
                        removes.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total_adds = successful_adds.load(Ordering::Relaxed);
    let total_removes = successful_removes.load(Ordering::Relaxed);
    let present = usize::from(set.find(the_value));

    println!(
        "Single value contention - Adds: {}, Removes: {}",
        total_adds, total_removes
    );

    assert_eq!(total_adds, total_removes + present);
    assert_eq!(set.len(), present);
}

/// Per-value accounting over a mixed workload: for every value,
/// successful adds - successful removes == present_after - present_before
pub fn test_value_balance<C>()
where
    C: ConcurrentSet + Default + 'static,
{
    let set = Arc::new(C::default());
    let num_threads = 8;
    let ops_per_thread = 20_000;
    let range = 128;

    // Prefill the even values.
    for v in (0..range).step_by(2) {
        set.add(v as Value);
    }

    let barrier = Arc::new(Barrier::new(num_threads));
    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let set = Arc::clone(&set);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut net = vec![0i64; range];
                barrier.wait();

                for i in 0..ops_per_thread {
                    let slot = (i * 31 + t * 17 + i / 7) % range;
                    let value = slot as Value;
                    match (i + t) % 3 {
                        0 => {
                            if set.add(value) {
                                net[slot] += 1;
                            }
                        }
                        1 => {
                            if set.remove(value) {
                                net[slot] -= 1;
                            }
                        }
                        _ => {
                            set.find(value);
                        }
                    }
                }
                net
            })
        })
        .collect();

    let mut net = vec![0i64; range];
    for handle in handles {
        for (slot, delta) in handle.join().unwrap().into_iter().enumerate() {
            net[slot] += delta;
        }
    }

    for (slot, delta) in net.iter().enumerate() {
        let before = i64::from(slot % 2 == 0);
        let after = i64::from(set.find(slot as Value));
        assert_eq!(
            *delta,
            after - before,
            "value {} lost or duplicated an update",
            slot
        );
    }

    let present = (0..range).filter(|slot| set.find(*slot as Value)).count();
    assert_eq!(set.validate(), Ok(present));
}
