// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Bounded, time-aware memoization of functions and lazily computed values.
//!
//! This crate provides two small caching primitives:
//!
//! - [`Memoized`] wraps a single-argument function and remembers its results, keyed by argument.
//!   The cache is bounded by a maximum size and can optionally expire after a clearing interval.
//! - [`Thunk`] and [`ExpiringThunk`] wrap a zero-argument computation and keep its single result,
//!   either forever or until a clearing interval elapses.
//!
//! # Eviction
//!
//! Caches are never trimmed entry by entry. When a time or size limit is hit, the whole cache is
//! dropped at once and the clearing interval restarts. Elapsed time is measured with the monotonic
//! clock of a [`tick::Clock`], so adjustments to the system clock do not trigger or delay a wipe.
//!
//! # Concurrency
//!
//! Every wrapper holds one lock for the full duration of a call, including the wrapped
//! computation. Calls on the same wrapper are serialized and the computation never runs twice
//! concurrently. Wrappers are `Send` and `Sync` when their contents are, and can be shared via
//! [`Arc`](std::sync::Arc).
//!
//! # Failures
//!
//! Fallible computations return [`Result`](std::result::Result) and are wrapped with the `try_`
//! functions. Errors propagate to the caller unchanged and are never cached.
//!
//! # Examples
//!
//! ```
//! use std::num::NonZeroUsize;
//! use std::time::Duration;
//!
//! let slow_square = |x: &u64| {
//!     // Imagine something expensive here.
//!     x * x
//! };
//!
//! let square = memoria::memoize_with(NonZeroUsize::new(128).unwrap(), Some(Duration::from_secs(60)), slow_square);
//! assert_eq!(square.call(4), 16);
//! assert_eq!(square.len(), 1);
//!
//! let greeting = memoria::lazy(|| format!("hello from {}", std::process::id()));
//! assert!(greeting.get().starts_with("hello"));
//! ```
//!
//! # Logging
//!
//! With the default `logs` feature, every wipe emits a `debug` level `tracing` event named
//! `memoria.cleared` carrying the instance name, the reason and the number of dropped entries.

mod builder;
mod error;
mod expiry;
mod memoize;
mod memoized;
mod telemetry;
mod thunk;

#[doc(inline)]
pub use builder::MemoizerBuilder;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use memoize::{
    DEFAULT_MAX_CACHE_SIZE, memoize, memoize_bounded, memoize_expiring, memoize_with, try_memoize, try_memoize_bounded,
    try_memoize_expiring, try_memoize_with,
};
#[doc(inline)]
pub use memoized::Memoized;
#[doc(inline)]
pub use thunk::{ExpiringThunk, Thunk, lazy, lazy_expiring, try_lazy, try_lazy_expiring};
