use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};
use crate::triggers::dispatch_event;

use super::health::{health, stats};
use super::metrics::prometheus_metrics;
use super::rules::{list_rules, reload_rules};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Event trigger
                .route("/events", post(dispatch_event))
                // Rule administration
                .route("/rules", get(list_rules))
                .route("/rules/reload", post(reload_rules))
                .layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
