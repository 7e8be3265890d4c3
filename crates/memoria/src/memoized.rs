// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bounded, time-aware memoization of single-argument functions.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::builder::MemoizerBuilder;
use crate::expiry::Expiry;
use crate::telemetry::{ClearReason, record_clear};

/// Name used in log events when none is configured.
pub(crate) const DEFAULT_NAME: &str = "memoized";

/// A memoized version of a single-argument function.
///
/// Results are kept in a map keyed by the argument. The map is never trimmed entry by entry;
/// instead the whole map is dropped when either:
///
/// - the configured clearing interval has elapsed since the previous wipe, or
/// - storing one more result would bring the map to its maximum size.
///
/// The size check runs on every call, before the lookup, so a wipe can happen even when the
/// argument is already cached. With a maximum size of 1 every call wipes and recomputes.
///
/// # Concurrency
///
/// A single lock guards the map and is held while the wrapped function runs. Calls on the same
/// instance, including calls for different arguments, are fully serialized, and the wrapped
/// function never runs twice concurrently. A slow computation makes every other caller wait.
///
/// Calling a memoized function from inside its own computation deadlocks.
///
/// # Failures
///
/// Fallible functions are wrapped with the `try_` constructors and invoked with
/// [`try_call`][Self::try_call]. Errors are returned to the caller and never stored, so the next
/// call with the same argument runs the function again. A wipe performed earlier in the failing
/// call stays in effect. A panicking computation releases the lock and stores nothing.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let calls = AtomicUsize::new(0);
/// let square = memoria::memoize(|x: &u64| {
///     calls.fetch_add(1, Ordering::Relaxed);
///     x * x
/// });
///
/// assert_eq!(square.call(12), 144);
/// assert_eq!(square.call(12), 144);
/// assert_eq!(calls.load(Ordering::Relaxed), 1);
/// ```
pub struct Memoized<A, B, F> {
    name: &'static str,
    max_cache_size: NonZeroUsize,
    expiry: Expiry,
    state: Mutex<State<A, B>>,
    func: F,
}

struct State<A, B> {
    entries: HashMap<A, B>,
    last_clear: Instant,
}

impl<A, B> State<A, B> {
    fn clear(&mut self, now: Instant, name: &'static str, reason: ClearReason) {
        let evicted = self.entries.len();
        self.entries.clear();
        self.last_clear = now;
        record_clear(name, reason, evicted);
    }
}

impl Memoized<(), (), ()> {
    /// Creates a builder for configuring a memoized function.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use memoria::Memoized;
    ///
    /// let lengths = Memoized::builder()
    ///     .max_cache_size(1024)
    ///     .clearing_interval(Duration::from_secs(300))
    ///     .name("lengths")
    ///     .build(|s: &String| s.len())?;
    ///
    /// assert_eq!(lengths.call("hello".to_string()), 5);
    /// # Ok::<(), memoria::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> MemoizerBuilder {
        MemoizerBuilder::new()
    }
}

impl<A, B, F> Memoized<A, B, F> {
    pub(crate) fn new(name: &'static str, max_cache_size: NonZeroUsize, expiry: Expiry, func: F) -> Self {
        let last_clear = expiry.now();
        Self {
            name,
            max_cache_size,
            expiry,
            state: Mutex::new(State {
                entries: HashMap::new(),
                last_clear,
            }),
            func,
        }
    }

    /// Returns the name used to identify this instance in log events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the size at which the cache is wiped.
    #[must_use]
    pub fn max_cache_size(&self) -> NonZeroUsize {
        self.max_cache_size
    }

    /// Returns the interval after which the cache is wiped, if any.
    #[must_use]
    pub fn clearing_interval(&self) -> Option<Duration> {
        self.expiry.interval()
    }

    /// Returns the number of cached results.
    ///
    /// This waits for any computation in progress on another thread.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns `true` if no results are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached result and restarts the clearing interval.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let now = self.expiry.now();
        state.clear(now, self.name, ClearReason::Manual);
    }
}

impl<A, B, F> Memoized<A, B, F>
where
    A: Eq + Hash,
    B: Clone,
{
    fn get_or_try_compute<E>(&self, arg: A, compute: impl FnOnce(&A) -> Result<B, E>) -> Result<B, E> {
        let mut state = self.state.lock();
        let now = self.expiry.now();

        if self.expiry.is_due(state.last_clear, now) {
            state.clear(now, self.name, ClearReason::Interval);
        } else if state.entries.len() + 1 >= self.max_cache_size.get() {
            state.clear(now, self.name, ClearReason::Capacity);
        }

        if let Some(value) = state.entries.get(&arg) {
            return Ok(value.clone());
        }

        let value = compute(&arg)?;
        state.entries.insert(arg, value.clone());
        Ok(value)
    }

    /// Returns the result for `arg`, computing it if needed.
    ///
    /// Only successful results are cached.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the wrapped function, unchanged.
    pub fn try_call<E>(&self, arg: A) -> Result<B, E>
    where
        F: Fn(&A) -> Result<B, E>,
    {
        self.get_or_try_compute(arg, &self.func)
    }

    /// Converts this memoized function into a plain closure returning `Result`.
    #[must_use]
    pub fn into_try_fn<E>(self) -> impl Fn(A) -> Result<B, E>
    where
        F: Fn(&A) -> Result<B, E>,
    {
        move |arg| self.try_call(arg)
    }
}

impl<A, B, F> Memoized<A, B, F>
where
    A: Eq + Hash,
    B: Clone,
    F: Fn(&A) -> B,
{
    /// Returns the result for `arg`, computing and caching it if needed.
    pub fn call(&self, arg: A) -> B {
        let Ok(value) = self.get_or_try_compute(arg, |arg| Ok::<_, Infallible>((self.func)(arg)));
        value
    }

    /// Converts this memoized function into a plain closure.
    ///
    /// # Examples
    ///
    /// ```
    /// let double = memoria::memoize(|x: &i32| x * 2).into_fn();
    ///
    /// let doubled: Vec<i32> = [1, 2, 3].into_iter().map(&double).collect();
    /// assert_eq!(doubled, [2, 4, 6]);
    /// ```
    #[must_use]
    pub fn into_fn(self) -> impl Fn(A) -> B {
        move |arg| self.call(arg)
    }
}

impl<A, B, F> Debug for Memoized<A, B, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("max_cache_size", &self.max_cache_size)
            .field("clearing_interval", &self.expiry.interval())
            .finish_non_exhaustive()
    }
}
