//! Metric recording helpers

use prometheus::{Encoder, TextEncoder};

use super::{
    DISPATCH_FAILURES_TOTAL, DISPATCH_LATENCY, EVENTS_RECEIVED_TOTAL, EVENTS_SKIPPED_TOTAL,
    JOBS_ENQUEUED_TOTAL, LOG_ENTRIES_TOTAL, RULES_DECLINED_TOTAL, RULES_MATCHED_TOTAL,
};

/// Encode all registered metrics in the Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    pub fn record_event(tag: &str) {
        EVENTS_RECEIVED_TOTAL.with_label_values(&[tag]).inc();
    }

    pub fn record_skipped(reason: &str) {
        EVENTS_SKIPPED_TOTAL.with_label_values(&[reason]).inc();
    }

    pub fn record_rules_matched(count: usize) {
        RULES_MATCHED_TOTAL.inc_by(count as u64);
    }

    pub fn record_declined() {
        RULES_DECLINED_TOTAL.inc();
    }

    pub fn record_enqueued() {
        JOBS_ENQUEUED_TOTAL.inc();
    }

    pub fn record_log_entry(test_mode: bool) {
        let mode = if test_mode { "test" } else { "regular" };
        LOG_ENTRIES_TOTAL.with_label_values(&[mode]).inc();
    }

    pub fn record_failure(stage: &str) {
        DISPATCH_FAILURES_TOTAL.with_label_values(&[stage]).inc();
    }

    pub fn observe_latency(seconds: f64) {
        DISPATCH_LATENCY.observe(seconds);
    }
}
