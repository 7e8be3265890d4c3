// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Time-based invalidation shared by memoized functions and expiring thunks.

use std::time::{Duration, Instant};

use tick::Clock;
use tick::runtime::InactiveClock;

/// Decides when a cache is due for a whole wipe based on elapsed time.
///
/// The timestamp of the last wipe lives next to the cached data, under the same lock,
/// so this type only holds the immutable schedule.
#[derive(Debug, Clone)]
pub(crate) struct Expiry {
    clock: Clock,
    interval: Option<Duration>,
}

impl Expiry {
    pub(crate) fn new(clock: Clock, interval: Option<Duration>) -> Self {
        Self { clock, interval }
    }

    /// Current monotonic time as seen by the configured clock.
    pub(crate) fn now(&self) -> Instant {
        self.clock.instant()
    }

    pub(crate) fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Returns `true` once at least `interval` has passed since `last_clear`.
    ///
    /// Without an interval the cache never expires on time alone.
    pub(crate) fn is_due(&self, last_clear: Instant, now: Instant) -> bool {
        self.interval
            .is_some_and(|interval| now.saturating_duration_since(last_clear) >= interval)
    }
}

/// A clock reading real monotonic time.
///
/// Only [`Clock::instant`] is used, so the clock driver that advances timers is not needed.
pub(crate) fn system_clock() -> Clock {
    let (clock, _driver) = InactiveClock::default().activate();
    clock
}
