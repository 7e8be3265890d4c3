// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for memoizer construction.

/// An error raised while configuring a memoized function.
///
/// Failures of the wrapped computation are never converted into this type; they reach
/// the caller unchanged. This error only reports configuration that cannot be honored,
/// such as a maximum cache size of zero.
///
/// # Example
///
/// ```
/// use memoria::Memoized;
///
/// let error = Memoized::builder()
///     .max_cache_size(0)
///     .build(|x: &u32| x * 2)
///     .unwrap_err();
///
/// assert!(error.to_string().contains("max_cache_size"));
/// ```
#[ohno::error]
#[display("invalid memoizer configuration: {reason}")]
pub struct Error {
    reason: String,
}

/// A specialized [`Result`] type for memoizer construction.
pub type Result<T> = std::result::Result<T, Error>;
