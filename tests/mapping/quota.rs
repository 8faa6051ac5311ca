//! Quota Gate Tests
//!
//! Spacing of gated calls across threads.

use hubsync::QuotaGate;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn gated_calls_are_spaced() {
    let interval = Duration::from_millis(40);
    let gate = Arc::new(QuotaGate::new(interval));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                gate.run(Instant::now)
            })
        })
        .collect();

    let mut starts: Vec<Instant> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    starts.sort();

    for pair in starts.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= interval);
    }
}

#[test]
fn first_call_does_not_wait() {
    let gate = QuotaGate::new(Duration::from_secs(10));
    let start = Instant::now();
    gate.run(|| ());
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(gate.last_release().is_some());
}

/// Sustained load through one gate
#[test]
#[ignore]
fn stress_sustained_gated_calls() {
    let interval = Duration::from_millis(5);
    let gate = Arc::new(QuotaGate::new(interval));
    let start = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                for _ in 0..25 {
                    gate.run(|| ());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // 200 calls need 199 intervals between them
    assert!(start.elapsed() >= interval * 199);
}
