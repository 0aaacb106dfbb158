use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::models::{ActorId, Event};
use crate::store::Store;
use crate::utils::error::AppError;

/// Enforces that only an event's owner may see or change the event and its
/// tasks and guests.
#[derive(Clone)]
pub struct AccessGuard {
    store: Arc<dyn Store>,
}

impl AccessGuard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Load the event and return it if `actor` owns it.
    pub async fn authorize_event_owner(
        &self,
        actor: &ActorId,
        event_id: Uuid,
    ) -> Result<Event, AppError> {
        let event = self
            .store
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", event_id)))?;

        if !event.is_owned_by(actor) {
            warn!(actor = %actor, event_id = %event_id, "Ownership check failed");
            return Err(AppError::Forbidden(
                "You do not have access to this event".to_string(),
            ));
        }

        Ok(event)
    }
}
