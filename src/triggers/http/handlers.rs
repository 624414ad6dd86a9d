//! HTTP trigger handlers

use axum::{extract::State, Json};

use crate::dispatch::DispatchOutcome;
use crate::error::Result;
use crate::server::AppState;

use super::models::DispatchEventRequest;

/// Run the dispatch pipeline for a posted event
#[tracing::instrument(name = "http.dispatch_event", skip_all)]
pub async fn dispatch_event(
    State(state): State<AppState>,
    Json(request): Json<DispatchEventRequest>,
) -> Result<Json<DispatchOutcome>> {
    request.validate()?;

    tracing::debug!(
        actor_id = %request.actor_id,
        event_type = %request.event.kind(),
        application_id = request.event.application().application_id,
        "Event received over HTTP"
    );

    let outcome = state
        .pipeline
        .dispatch(&request.actor(), &request.event)
        .await?;

    Ok(Json(outcome))
}
