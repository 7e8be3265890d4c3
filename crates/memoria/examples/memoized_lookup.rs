// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Demonstrates memoizing an expensive lookup with a bounded, expiring cache.
//!
//! Repeated lookups for the same user are served from the cache. Once the cache is about to hold
//! `max_cache_size` entries, or the clearing interval elapses, everything is dropped at once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use memoria::Memoized;

fn main() -> Result<(), memoria::Error> {
    let lookups = AtomicUsize::new(0);

    let display_name = Memoized::builder()
        .name("display_names")
        .max_cache_size(4)
        .clearing_interval(Duration::from_millis(200))
        .build(|user_id: &u32| {
            lookups.fetch_add(1, Ordering::Relaxed);
            // Simulate a slow backend call.
            thread::sleep(Duration::from_millis(10));
            format!("user-{user_id}")
        })?;

    for user_id in [1, 2, 1, 2, 1] {
        println!("{user_id} -> {}", display_name.call(user_id));
    }
    println!("backend lookups so far: {}", lookups.load(Ordering::Relaxed));

    // A fourth distinct entry would reach the bound, so the cache is wiped first.
    for user_id in [3, 4, 1] {
        println!("{user_id} -> {}", display_name.call(user_id));
    }
    println!("backend lookups so far: {}", lookups.load(Ordering::Relaxed));

    thread::sleep(Duration::from_millis(250));
    println!("1 -> {} (after expiry)", display_name.call(1));
    println!("backend lookups in total: {}", lookups.load(Ordering::Relaxed));

    Ok(())
}
