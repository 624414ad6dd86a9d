//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::dispatch::DispatcherStatsSnapshot;
use crate::queue::QueueBackendStats;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub dispatch_enabled: bool,
    pub rules_loaded: usize,
    pub queue: QueueBackendStats,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub dispatcher: DispatcherStatsSnapshot,
    pub queue: QueueBackendStats,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let queue = state.pipeline.queue().stats().await;
    let dispatch_enabled = state.pipeline.config().enabled;

    let status = if dispatch_enabled { "healthy" } else { "disabled" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        dispatch_enabled,
        rules_loaded: state.pipeline.rules().rule_count(),
        queue,
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        dispatcher: state.pipeline.stats(),
        queue: state.pipeline.queue().stats().await,
    })
}
