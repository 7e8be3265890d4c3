// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Free functions creating memoized functions.

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::Memoized;
use crate::expiry::{Expiry, system_clock};
use crate::memoized::DEFAULT_NAME;

/// Maximum cache size used when none is given.
pub const DEFAULT_MAX_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(256).expect("256 is not zero");

fn wrap<A, B, F>(max_cache_size: NonZeroUsize, clearing_interval: Option<Duration>, func: F) -> Memoized<A, B, F> {
    Memoized::new(DEFAULT_NAME, max_cache_size, Expiry::new(system_clock(), clearing_interval), func)
}

/// Memoizes `func`, wiping the cache before it reaches [`DEFAULT_MAX_CACHE_SIZE`] entries.
///
/// # Examples
///
/// ```
/// let square = memoria::memoize(|x: &u64| x * x);
///
/// assert_eq!(square.call(9), 81);
/// ```
#[must_use]
pub fn memoize<A, B, F>(func: F) -> Memoized<A, B, F>
where
    F: Fn(&A) -> B,
{
    wrap(DEFAULT_MAX_CACHE_SIZE, None, func)
}

/// Memoizes `func`, wiping the cache before it reaches `max_cache_size` entries.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// let square = memoria::memoize_bounded(NonZeroUsize::new(32).unwrap(), |x: &u64| x * x);
///
/// assert_eq!(square.call(9), 81);
/// ```
#[must_use]
pub fn memoize_bounded<A, B, F>(max_cache_size: NonZeroUsize, func: F) -> Memoized<A, B, F>
where
    F: Fn(&A) -> B,
{
    wrap(max_cache_size, None, func)
}

/// Memoizes `func`, wiping the cache whenever `clearing_interval` has elapsed since the
/// previous wipe, or before it reaches [`DEFAULT_MAX_CACHE_SIZE`] entries.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// let square = memoria::memoize_expiring(Duration::from_secs(60), |x: &u64| x * x);
///
/// assert_eq!(square.call(9), 81);
/// ```
#[must_use]
pub fn memoize_expiring<A, B, F>(clearing_interval: Duration, func: F) -> Memoized<A, B, F>
where
    F: Fn(&A) -> B,
{
    wrap(DEFAULT_MAX_CACHE_SIZE, Some(clearing_interval), func)
}

/// Memoizes `func` with an explicit maximum size and an optional clearing interval.
#[must_use]
pub fn memoize_with<A, B, F>(max_cache_size: NonZeroUsize, clearing_interval: Option<Duration>, func: F) -> Memoized<A, B, F>
where
    F: Fn(&A) -> B,
{
    wrap(max_cache_size, clearing_interval, func)
}

/// Memoizes a fallible `func`. Only `Ok` results are cached.
///
/// # Examples
///
/// ```
/// let parse = memoria::try_memoize(|s: &String| s.parse::<u8>());
///
/// assert_eq!(parse.try_call("7".to_string()), Ok(7));
/// assert!(parse.try_call("700".to_string()).is_err());
/// ```
#[must_use]
pub fn try_memoize<A, B, E, F>(func: F) -> Memoized<A, B, F>
where
    F: Fn(&A) -> Result<B, E>,
{
    wrap(DEFAULT_MAX_CACHE_SIZE, None, func)
}

/// Fallible counterpart of [`memoize_bounded`].
#[must_use]
pub fn try_memoize_bounded<A, B, E, F>(max_cache_size: NonZeroUsize, func: F) -> Memoized<A, B, F>
where
    F: Fn(&A) -> Result<B, E>,
{
    wrap(max_cache_size, None, func)
}

/// Fallible counterpart of [`memoize_expiring`].
#[must_use]
pub fn try_memoize_expiring<A, B, E, F>(clearing_interval: Duration, func: F) -> Memoized<A, B, F>
where
    F: Fn(&A) -> Result<B, E>,
{
    wrap(DEFAULT_MAX_CACHE_SIZE, Some(clearing_interval), func)
}

/// Fallible counterpart of [`memoize_with`].
#[must_use]
pub fn try_memoize_with<A, B, E, F>(
    max_cache_size: NonZeroUsize,
    clearing_interval: Option<Duration>,
    func: F,
) -> Memoized<A, B, F>
where
    F: Fn(&A) -> Result<B, E>,
{
    wrap(max_cache_size, clearing_interval, func)
}
