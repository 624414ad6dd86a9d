//! Request models for the HTTP trigger

use serde::{Deserialize, Serialize};

use crate::dispatch::{ActorContext, DomainEvent, UserId};
use crate::error::AppError;

/// Body of `POST /api/v1/events`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchEventRequest {
    /// User performing the action that raised the event
    pub actor_id: UserId,
    pub event: DomainEvent,
}

impl DispatchEventRequest {
    pub fn actor(&self) -> ActorContext {
        ActorContext::new(self.actor_id)
    }

    /// Guests (user id 0) cannot apply to groups, so they cannot raise events either
    pub fn validate(&self) -> Result<(), AppError> {
        if self.actor_id.0 == 0 {
            return Err(AppError::Validation(
                "actor_id must identify a registered user".to_string(),
            ));
        }
        if self.event.applicant().user_id.0 == 0 {
            return Err(AppError::Validation(
                "applicant must be a registered user".to_string(),
            ));
        }
        Ok(())
    }
}
