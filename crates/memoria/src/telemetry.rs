// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Log events emitted when a cache is wiped.

/// Why a cache was wiped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClearReason {
    /// The clearing interval elapsed since the previous wipe.
    Interval,
    /// Storing one more result would reach the maximum cache size.
    Capacity,
    /// The owner asked for the wipe.
    Manual,
}

impl ClearReason {
    #[cfg_attr(not(any(feature = "logs", test)), expect(dead_code, reason = "Only read by log events"))]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Capacity => "capacity",
            Self::Manual => "manual",
        }
    }
}

/// Records a whole-cache wipe.
#[cfg_attr(not(any(feature = "logs", test)), expect(unused_variables, reason = "No-op when logging is disabled"))]
pub(crate) fn record_clear(name: &'static str, reason: ClearReason, evicted: usize) {
    // Field names are asserted by the tests below; keep them in sync.
    #[cfg(any(feature = "logs", test))]
    tracing::debug!(
        memoria.name = name,
        memoria.reason = reason.as_str(),
        memoria.evicted = evicted,
        "memoria.cleared"
    );
}


#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::testing::LogCapture;
    use super::*;

    #[test]
    fn reason_names_are_stable() {
        assert_eq!(ClearReason::Interval.as_str(), "interval");
        assert_eq!(ClearReason::Capacity.as_str(), "capacity");
        assert_eq!(ClearReason::Manual.as_str(), "manual");
    }

    #[test]
    fn record_clear_emits_fields() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        record_clear("lookups", ClearReason::Capacity, 31);

        capture.assert_contains("memoria.cleared");
        capture.assert_contains("memoria.name=\"lookups\"");
        capture.assert_contains("memoria.reason=\"capacity\"");
        capture.assert_contains("memoria.evicted=31");
    }
}
