//! Metric names and recorders for store activity.
//!
//! Metrics go through the `metrics` facade only. Nothing is recorded unless
//! the application installs a recorder (a Prometheus exporter, a statsd
//! bridge, a test recorder).
//!
//! # Example
//!
//! ```
//! use reduxide_runtime::metrics;
//!
//! // Once, after installing a recorder.
//! metrics::describe_metrics();
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use reduxide_core::{ErrorCategory, StoreError};
use std::time::Duration;

/// Dispatches that reached the reducer.
pub const DISPATCH_TOTAL: &str = "reduxide.dispatch.total";

/// Dispatches refused before the reducer ran. Labelled by error category.
pub const DISPATCH_REJECTED: &str = "reduxide.dispatch.rejected";

/// Listener invocations.
pub const LISTENERS_NOTIFIED: &str = "reduxide.listeners.notified";

/// Wall-clock time spent in the root reducer.
pub const REDUCER_DURATION_SECONDS: &str = "reduxide.reducer.duration_seconds";

/// Register descriptions for every metric this crate records.
pub fn describe_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Total number of actions passed to the root reducer");
    describe_counter!(
        DISPATCH_REJECTED,
        "Total number of dispatches refused by validation or the reentrancy guard"
    );
    describe_counter!(LISTENERS_NOTIFIED, "Total number of listener invocations");
    describe_histogram!(
        REDUCER_DURATION_SECONDS,
        "Time taken by the root reducer for one action"
    );
}

/// Store metrics recorder.
pub(crate) struct StoreMetrics;

impl StoreMetrics {
    /// Record an action handed to the reducer.
    pub(crate) fn record_dispatch(duration: Duration) {
        counter!(DISPATCH_TOTAL).increment(1);
        histogram!(REDUCER_DURATION_SECONDS).record(duration.as_secs_f64());
    }

    /// Record a dispatch refused before the reducer ran.
    pub(crate) fn record_rejection(error: &StoreError) {
        counter!(DISPATCH_REJECTED, "category" => category_label(error.category())).increment(1);
    }

    /// Record one listener invocation.
    pub(crate) fn record_listener() {
        counter!(LISTENERS_NOTIFIED).increment(1);
    }
}

const fn category_label(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Configuration => "configuration",
        ErrorCategory::Validation => "validation",
        ErrorCategory::InvalidOperation => "invalid_operation",
        ErrorCategory::External => "external",
    }
}
