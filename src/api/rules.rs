//! Rule administration endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::metrics::RULES_LOADED;
use crate::rules::{load_rules_file, NotificationRule};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadRulesResponse {
    /// Rules found in the file
    pub loaded: usize,
    /// Rules now served (active, known tag)
    pub active: usize,
}

/// GET /api/v1/rules
pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<NotificationRule>> {
    Json(state.rule_cache.all())
}

/// POST /api/v1/rules/reload
#[tracing::instrument(name = "http.reload_rules", skip(state))]
pub async fn reload_rules(State(state): State<AppState>) -> Result<Json<ReloadRulesResponse>> {
    let rules = load_rules_file(&state.settings.rules.path)?;
    let loaded = rules.len();
    let active = state.rule_cache.replace_all(rules);
    RULES_LOADED.set(active as i64);

    tracing::info!(loaded = loaded, active = active, "Rules reloaded");

    Ok(Json(ReloadRulesResponse { loaded, active }))
}
