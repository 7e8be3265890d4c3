// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring memoized functions.

use std::num::NonZeroUsize;
use std::time::Duration;

use tick::Clock;

use crate::expiry::{Expiry, system_clock};
use crate::memoized::DEFAULT_NAME;
use crate::{DEFAULT_MAX_CACHE_SIZE, Error, Memoized, Result};

/// Builder for configuring a [`Memoized`] function.
///
/// Created by calling [`Memoized::builder`]. Unlike the `memoize*` functions, the builder
/// accepts a raw maximum size and validates it when the memoized function is built.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use memoria::Memoized;
///
/// let parse = Memoized::builder()
///     .max_cache_size(64)
///     .clearing_interval(Duration::from_secs(30))
///     .build_fallible(|s: &String| s.parse::<i64>())?;
///
/// assert_eq!(parse.try_call("42".to_string()), Ok(42));
/// assert!(parse.try_call("forty-two".to_string()).is_err());
/// # Ok::<(), memoria::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoizerBuilder {
    name: &'static str,
    max_cache_size: usize,
    clearing_interval: Option<Duration>,
    clock: Option<Clock>,
}

impl Default for MemoizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoizerBuilder {
    /// Creates a builder with a maximum size of 256, no clearing interval and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE.get(),
            clearing_interval: None,
            clock: None,
        }
    }

    /// Sets the size at which the cache is wiped.
    ///
    /// The cache is wiped whenever storing one more result would make it hold `size` entries,
    /// so at most `size - 1` results are ever cached together. Zero is rejected by
    /// [`build`][Self::build].
    #[must_use]
    pub fn max_cache_size(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }

    /// Wipes the whole cache once `interval` has elapsed since the previous wipe.
    #[must_use]
    pub fn clearing_interval(mut self, interval: Duration) -> Self {
        self.clearing_interval = Some(interval);
        self
    }

    /// Sets the clock used to measure the clearing interval.
    ///
    /// Pass a clock created from `tick::ClockControl` to control time in tests.
    ///
    /// # Examples
    ///
    /// ```
    /// use memoria::Memoized;
    /// use tick::Clock;
    ///
    /// let len = Memoized::builder()
    ///     .clock(Clock::new_frozen())
    ///     .build(|s: &&str| s.len())?;
    ///
    /// assert_eq!(len.call("abc"), 3);
    /// # Ok::<(), memoria::Error>(())
    /// ```
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the name identifying the memoized function in log events.
    #[must_use]
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Builds a memoized version of an infallible function.
    ///
    /// # Errors
    ///
    /// Returns an error if the maximum cache size is zero.
    pub fn build<A, B, F>(self, func: F) -> Result<Memoized<A, B, F>>
    where
        F: Fn(&A) -> B,
    {
        self.assemble(func)
    }

    /// Builds a memoized version of a fallible function. Only `Ok` results are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the maximum cache size is zero.
    pub fn build_fallible<A, B, E, F>(self, func: F) -> Result<Memoized<A, B, F>>
    where
        F: Fn(&A) -> std::result::Result<B, E>,
    {
        self.assemble(func)
    }

    fn assemble<A, B, F>(self, func: F) -> Result<Memoized<A, B, F>> {
        let max_cache_size = NonZeroUsize::new(self.max_cache_size).ok_or_else(|| Error::new("max_cache_size must be at least 1"))?;
        let clock = self.clock.unwrap_or_else(system_clock);

        Ok(Memoized::new(self.name, max_cache_size, Expiry::new(clock, self.clearing_interval), func))
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use tick::ClockControl;

    use super::*;

    #[test]
    fn defaults() {
        let m = MemoizerBuilder::new().build(|x: &u8| *x).unwrap();

        assert_eq!(m.name(), "memoized");
        assert_eq!(m.max_cache_size().get(), 256);
        assert_eq!(m.clearing_interval(), None);
    }

    #[test]
    fn applies_settings() {
        let m = Memoized::builder()
            .name("custom")
            .max_cache_size(3)
            .clearing_interval(Duration::from_millis(250))
            .clock(Clock::new_frozen())
            .build(|x: &u8| *x)
            .unwrap();

        assert_eq!(m.name(), "custom");
        assert_eq!(m.max_cache_size().get(), 3);
        assert_eq!(m.clearing_interval(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn rejects_zero_size() {
        let error = Memoized::builder().max_cache_size(0).build(|x: &u8| *x).unwrap_err();

        assert!(error.to_string().contains("max_cache_size must be at least 1"));
    }

    #[test]
    fn rejects_zero_size_for_fallible() {
        let result = Memoized::builder()
            .max_cache_size(0)
            .build_fallible(|x: &u8| Ok::<_, String>(*x));

        result.unwrap_err();
    }

    #[test]
    fn uses_configured_clock() {
        let control = ClockControl::new();
        let m = Memoized::builder()
            .clearing_interval(Duration::from_secs(1))
            .clock(control.to_clock())
            .build(|x: &u8| *x)
            .unwrap();

        m.call(1);
        assert_eq!(m.len(), 1);

        control.advance(Duration::from_secs(1));
        m.call(2);
        assert_eq!(m.len(), 1);
    }
}
