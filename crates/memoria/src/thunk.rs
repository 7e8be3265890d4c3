// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Lazily computed single values.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tick::Clock;

use crate::expiry::{Expiry, system_clock};
use crate::telemetry::{ClearReason, record_clear};

const THUNK_NAME: &str = "thunk";

/// A value computed on first access and kept forever.
///
/// Concurrent first accesses block while exactly one of them runs the computation. If the
/// computation of a fallible thunk fails, nothing is stored and the next access tries again.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let runs = AtomicUsize::new(0);
/// let config = memoria::lazy(|| {
///     runs.fetch_add(1, Ordering::Relaxed);
///     vec!["a", "b"]
/// });
///
/// assert_eq!(config.get().len(), 2);
/// assert_eq!(config.get().len(), 2);
/// assert_eq!(runs.load(Ordering::Relaxed), 1);
/// ```
pub struct Thunk<T, F> {
    cell: OnceCell<T>,
    compute: F,
}

impl<T, F> Thunk<T, F> {
    /// Creates a thunk that runs `compute` on first access.
    #[must_use]
    pub fn new(compute: F) -> Self {
        Self {
            cell: OnceCell::new(),
            compute,
        }
    }

    /// Returns `true` once the value has been computed.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the value, computing it if no earlier attempt succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the computation, unchanged.
    pub fn try_get<E>(&self) -> Result<&T, E>
    where
        F: Fn() -> Result<T, E>,
    {
        self.cell.get_or_try_init(&self.compute)
    }
}

impl<T, F> Thunk<T, F>
where
    F: Fn() -> T,
{
    /// Returns the value, computing it on first access.
    pub fn get(&self) -> &T {
        self.cell.get_or_init(&self.compute)
    }
}

impl<T: Debug, F> Debug for Thunk<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thunk").field("value", &self.cell.get()).finish_non_exhaustive()
    }
}

/// A lazily computed value that is dropped once a clearing interval elapses.
///
/// The interval is measured from construction and from every later wipe. The first access
/// after the interval has elapsed clears the slot and computes a fresh value. Accesses are
/// serialized by a single lock held while the computation runs.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use memoria::ExpiringThunk;
/// use tick::ClockControl;
///
/// let control = ClockControl::new();
/// let generation = std::sync::atomic::AtomicU32::new(0);
/// let token = ExpiringThunk::with_clock(control.to_clock(), Duration::from_secs(60), || {
///     generation.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1
/// });
///
/// assert_eq!(token.get(), 1);
/// assert_eq!(token.get(), 1);
///
/// control.advance(Duration::from_secs(60));
/// assert_eq!(token.get(), 2);
/// ```
pub struct ExpiringThunk<T, F> {
    expiry: Expiry,
    slot: Mutex<Slot<T>>,
    compute: F,
}

struct Slot<T> {
    value: Option<T>,
    last_clear: Instant,
}

impl<T, F> ExpiringThunk<T, F> {
    /// Creates a thunk whose value is dropped every `clearing_interval`, measured with the
    /// system clock.
    #[must_use]
    pub fn new(clearing_interval: Duration, compute: F) -> Self {
        Self::with_clock(system_clock(), clearing_interval, compute)
    }

    /// Creates a thunk whose value is dropped every `clearing_interval`, measured with `clock`.
    #[must_use]
    pub fn with_clock(clock: Clock, clearing_interval: Duration, compute: F) -> Self {
        let expiry = Expiry::new(clock, Some(clearing_interval));
        let last_clear = expiry.now();
        Self {
            expiry,
            slot: Mutex::new(Slot { value: None, last_clear }),
            compute,
        }
    }

    /// Returns the interval after which the value is dropped.
    #[must_use]
    pub fn clearing_interval(&self) -> Duration {
        self.expiry.interval().unwrap_or(Duration::MAX)
    }

    /// Returns `true` if a value is stored.
    ///
    /// A stored value may still be dropped by the next access if its interval has elapsed.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.slot.lock().value.is_some()
    }

    /// Drops the stored value and restarts the clearing interval.
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        let evicted = usize::from(slot.value.take().is_some());
        slot.last_clear = self.expiry.now();
        record_clear(THUNK_NAME, ClearReason::Manual, evicted);
    }
}

impl<T: Clone, F> ExpiringThunk<T, F> {
    fn get_or_try_compute<E>(&self, compute: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let mut slot = self.slot.lock();
        let now = self.expiry.now();

        if self.expiry.is_due(slot.last_clear, now) {
            let evicted = usize::from(slot.value.take().is_some());
            slot.last_clear = now;
            record_clear(THUNK_NAME, ClearReason::Interval, evicted);
        }

        if let Some(value) = &slot.value {
            return Ok(value.clone());
        }

        let value = compute()?;
        slot.value = Some(value.clone());
        Ok(value)
    }

    /// Returns the value, computing it if needed.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the computation, unchanged. Nothing is stored.
    pub fn try_get<E>(&self) -> Result<T, E>
    where
        F: Fn() -> Result<T, E>,
    {
        self.get_or_try_compute(&self.compute)
    }
}

impl<T: Clone, F> ExpiringThunk<T, F>
where
    F: Fn() -> T,
{
    /// Returns a copy of the value, computing it if needed.
    pub fn get(&self) -> T {
        let Ok(value) = self.get_or_try_compute(|| Ok::<_, std::convert::Infallible>((self.compute)()));
        value
    }
}

impl<T, F> Debug for ExpiringThunk<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringThunk")
            .field("clearing_interval", &self.expiry.interval())
            .finish_non_exhaustive()
    }
}

/// Creates a [`Thunk`] that computes its value once, on first access.
#[must_use]
pub fn lazy<T, F>(compute: F) -> Thunk<T, F>
where
    F: Fn() -> T,
{
    Thunk::new(compute)
}

/// Creates a fallible [`Thunk`]. A failed computation is retried on the next access.
///
/// # Examples
///
/// ```
/// let port = memoria::try_lazy(|| "8080".parse::<u16>());
///
/// assert_eq!(port.try_get(), Ok(&8080));
/// ```
#[must_use]
pub fn try_lazy<T, E, F>(compute: F) -> Thunk<T, F>
where
    F: Fn() -> Result<T, E>,
{
    Thunk::new(compute)
}

/// Creates an [`ExpiringThunk`] recomputing its value once `clearing_interval` has elapsed.
#[must_use]
pub fn lazy_expiring<T, F>(clearing_interval: Duration, compute: F) -> ExpiringThunk<T, F>
where
    F: Fn() -> T,
{
    ExpiringThunk::new(clearing_interval, compute)
}

/// Fallible counterpart of [`lazy_expiring`].
#[must_use]
pub fn try_lazy_expiring<T, E, F>(clearing_interval: Duration, compute: F) -> ExpiringThunk<T, F>
where
    F: Fn() -> Result<T, E>,
{
    ExpiringThunk::new(clearing_interval, compute)
}
