//! Prometheus metrics for the dispatch service.
//!
//! - Event metrics (received, skipped by reason)
//! - Rule metrics (matched, declined)
//! - Output metrics (jobs enqueued, log entries written)
//! - Failure metrics (collaborator errors by stage)

mod helpers;

pub use helpers::{encode_metrics, DispatchMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "bot_dispatch";

lazy_static! {
    // ============================================================================
    // Event Metrics
    // ============================================================================

    /// Events received by rule tag
    pub static ref EVENTS_RECEIVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_events_received_total", METRIC_PREFIX),
        "Total application events received",
        &["tag"]
    ).unwrap();

    /// Events that produced no work, by reason
    pub static ref EVENTS_SKIPPED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_events_skipped_total", METRIC_PREFIX),
        "Total events skipped without side effects",
        &["reason"]
    ).unwrap();

    /// Dispatch duration
    pub static ref DISPATCH_LATENCY: Histogram = register_histogram!(
        format!("{}_dispatch_latency_seconds", METRIC_PREFIX),
        "Time spent dispatching one event in seconds",
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    ).unwrap();

    // ============================================================================
    // Rule Metrics
    // ============================================================================

    /// Rules matched by incoming events
    pub static ref RULES_MATCHED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_rules_matched_total", METRIC_PREFIX),
        "Total rules matched by events"
    ).unwrap();

    /// Rules whose eligibility check declined to notify
    pub static ref RULES_DECLINED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_rules_declined_total", METRIC_PREFIX),
        "Total rules that declined to notify"
    ).unwrap();

    // ============================================================================
    // Output Metrics
    // ============================================================================

    /// Jobs handed to the queue
    pub static ref JOBS_ENQUEUED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_jobs_enqueued_total", METRIC_PREFIX),
        "Total notification jobs enqueued"
    ).unwrap();

    /// Jobs taken off the in-memory queue by the consumer
    pub static ref JOBS_CONSUMED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_jobs_consumed_total", METRIC_PREFIX),
        "Total notification jobs handed off by the in-process consumer"
    ).unwrap();

    /// Bot log entries written, by mode
    pub static ref LOG_ENTRIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_log_entries_total", METRIC_PREFIX),
        "Total bot log entries written",
        &["mode"]
    ).unwrap();

    /// Jobs waiting in the in-memory queue
    pub static ref QUEUE_PENDING: IntGauge = register_int_gauge!(
        format!("{}_queue_pending", METRIC_PREFIX),
        "Jobs pending in the in-memory queue"
    ).unwrap();

    // ============================================================================
    // Failure Metrics
    // ============================================================================

    /// Collaborator failures that aborted a dispatch, by stage
    pub static ref DISPATCH_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatch_failures_total", METRIC_PREFIX),
        "Total dispatches aborted by a collaborator failure",
        &["stage"]
    ).unwrap();

    /// Oldest in-memory bot log entries dropped at capacity
    pub static ref LOG_ENTRIES_EVICTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_log_entries_evicted_total", METRIC_PREFIX),
        "Total in-memory bot log entries evicted at capacity"
    ).unwrap();

    /// Rule cache size
    pub static ref RULES_LOADED: IntGauge = register_int_gauge!(
        format!("{}_rules_loaded", METRIC_PREFIX),
        "Number of rules currently served by the rule cache"
    ).unwrap();
}
