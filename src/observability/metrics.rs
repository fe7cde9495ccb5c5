//! # Metrics
//!
//! Prometheus metrics for monitoring event delivery.
//!
//! ## Metrics Exposed
//!
//! - `kubewatch_events_received_total` - Total number of events received by the dispatcher
//! - `kubewatch_handler_events_total` - Events processed per handler, labeled by delivery outcome
//! - `kubewatch_eventbridge_failed_entries_total` - Entries rejected by EventBridge in an accepted request
//! - `kubewatch_eventbridge_put_events_duration_seconds` - Duration of `PutEvents` round trips

use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static EVENTS_RECEIVED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "kubewatch_events_received_total",
        "Total number of events received by the dispatcher",
    )
    .expect("Failed to create EVENTS_RECEIVED_TOTAL metric - this should never happen")
});

static HANDLER_EVENTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "kubewatch_handler_events_total",
            "Total number of events processed by each handler, by delivery outcome",
        ),
        &["handler", "outcome"],
    )
    .expect("Failed to create HANDLER_EVENTS_TOTAL metric - this should never happen")
});

static EVENTBRIDGE_FAILED_ENTRIES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "kubewatch_eventbridge_failed_entries_total",
        "Total number of entries EventBridge reported as failed",
    )
    .expect("Failed to create EVENTBRIDGE_FAILED_ENTRIES_TOTAL metric - this should never happen")
});

static EVENTBRIDGE_PUT_EVENTS_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "kubewatch_eventbridge_put_events_duration_seconds",
            "Duration of EventBridge PutEvents calls in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0]),
    )
    .expect("Failed to create EVENTBRIDGE_PUT_EVENTS_DURATION metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(EVENTS_RECEIVED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(HANDLER_EVENTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EVENTBRIDGE_FAILED_ENTRIES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EVENTBRIDGE_PUT_EVENTS_DURATION.clone()))?;

    Ok(())
}

pub fn increment_events_received() {
    EVENTS_RECEIVED_TOTAL.inc();
}

/// Record the outcome of one event for one handler
pub fn record_handler_outcome(handler: &str, outcome: &str) {
    HANDLER_EVENTS_TOTAL
        .with_label_values(&[handler, outcome])
        .inc();
}

#[must_use]
pub fn handler_outcome_count(handler: &str, outcome: &str) -> u64 {
    HANDLER_EVENTS_TOTAL
        .with_label_values(&[handler, outcome])
        .get()
}

pub fn increment_eventbridge_failed_entries(count: i64) {
    #[allow(clippy::cast_sign_loss, reason = "We ensure non-negative with max(0)")]
    let count_u64 = count.max(0) as u64;
    EVENTBRIDGE_FAILED_ENTRIES_TOTAL.inc_by(count_u64);
}

pub fn observe_put_events_duration(duration: f64) {
    EVENTBRIDGE_PUT_EVENTS_DURATION.observe(duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        // Registration may already have happened in another test; only a
        // duplicate registration error is acceptable here
        if let Err(e) = register_metrics() {
            assert!(e.to_string().contains("Duplicate"), "unexpected error: {e}");
        }
    }

    #[test]
    fn test_record_handler_outcome() {
        let before = handler_outcome_count("metrics-test", "delivered");
        record_handler_outcome("metrics-test", "delivered");
        record_handler_outcome("metrics-test", "delivered");
        assert_eq!(handler_outcome_count("metrics-test", "delivered"), before + 2);
    }
}
