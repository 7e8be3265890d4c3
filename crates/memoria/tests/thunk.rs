// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for thunks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use memoria::{ExpiringThunk, Thunk, lazy, try_lazy};
use tick::ClockControl;

static_assertions::assert_impl_all!(Thunk<String, fn() -> String>: Send, Sync);
static_assertions::assert_impl_all!(ExpiringThunk<String, fn() -> String>: Send, Sync);

#[test]
fn is_run_only_once() {
    let evaluations = AtomicUsize::new(0);
    let thunk = lazy(|| evaluations.fetch_add(1, Ordering::Relaxed) + 1);

    assert_eq!(evaluations.load(Ordering::Relaxed), 0);
    thunk.get();
    assert_eq!(evaluations.load(Ordering::Relaxed), 1);
    thunk.get();
    assert_eq!(evaluations.load(Ordering::Relaxed), 1);
}

#[test]
fn computes_correct_value() {
    let thunk = lazy(|| 42);

    assert_eq!(*thunk.get(), 42);
    assert_eq!(*thunk.get(), 42);
}

#[test]
fn failed_computation_is_retried() {
    let attempts = AtomicUsize::new(0);
    let thunk = try_lazy(|| {
        if attempts.fetch_add(1, Ordering::Relaxed) < 2 {
            Err("unavailable")
        } else {
            Ok("ready".to_string())
        }
    });

    assert_eq!(thunk.try_get(), Err("unavailable"));
    assert_eq!(thunk.try_get(), Err("unavailable"));
    assert_eq!(thunk.try_get().map(String::as_str), Ok("ready"));
    assert_eq!(thunk.try_get().map(String::as_str), Ok("ready"));
    assert_eq!(attempts.load(Ordering::Relaxed), 3);
}

#[test]
fn concurrent_first_access_computes_once() {
    const THREADS: usize = 8;

    let evaluations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evaluations);
    let thunk = Arc::new(lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        "value".to_string()
    }));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let thunk = Arc::clone(&thunk);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                thunk.get().clone()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "value");
    }
    assert_eq!(evaluations.load(Ordering::SeqCst), 1);
}

#[test]
fn expiring_thunk_recomputes_only_after_interval() {
    let control = ClockControl::new();
    let evaluations = AtomicUsize::new(0);
    let thunk = ExpiringThunk::with_clock(control.to_clock(), Duration::from_secs(2), || {
        evaluations.fetch_add(1, Ordering::Relaxed)
    });

    assert_eq!(thunk.get(), 0);
    control.advance(Duration::from_secs(1));
    assert_eq!(thunk.get(), 0);

    control.advance(Duration::from_secs(3));
    assert_eq!(thunk.get(), 1);
    assert_eq!(evaluations.load(Ordering::Relaxed), 2);
}

#[test]
fn expiring_thunk_is_empty_until_accessed() {
    let control = ClockControl::new();
    let thunk = ExpiringThunk::with_clock(control.to_clock(), Duration::from_secs(2), || 1);

    assert!(!thunk.is_computed());
    assert_eq!(thunk.get(), 1);
    assert!(thunk.is_computed());
}

#[test]
fn expiring_thunk_failure_is_not_stored() {
    let control = ClockControl::new();
    let attempts = AtomicUsize::new(0);
    let thunk = ExpiringThunk::with_clock(control.to_clock(), Duration::from_secs(2), || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed);
        if attempt == 0 { Err(attempt) } else { Ok(attempt) }
    });

    assert_eq!(thunk.try_get(), Err(0));
    assert_eq!(thunk.try_get(), Ok(1));
    assert_eq!(thunk.try_get(), Ok(1));
}

#[test]
fn expiring_thunk_uses_system_clock_by_default() {
    let thunk = memoria::lazy_expiring(Duration::from_secs(3600), || "cached");

    assert_eq!(thunk.get(), "cached");
    assert!(thunk.is_computed());
    assert_eq!(thunk.clearing_interval(), Duration::from_secs(3600));
}
