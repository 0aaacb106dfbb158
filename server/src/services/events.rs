use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::guard::AccessGuard;
use crate::models::{ActorId, CreateEventInput, Event, EventStatus, UpdateEventInput};
use crate::store::Store;
use crate::utils::error::AppError;

#[derive(Debug, Serialize)]
pub struct EventList {
    pub items: Vec<Event>,
    pub total: usize,
}

#[derive(Clone)]
pub struct EventService {
    pub(super) store: Arc<dyn Store>,
    pub(super) guard: AccessGuard,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            guard: AccessGuard::new(store.clone()),
            store,
        }
    }

    #[instrument(skip(self, input), fields(actor = %actor))]
    pub async fn create(
        &self,
        actor: &ActorId,
        input: CreateEventInput,
    ) -> Result<Event, AppError> {
        let event = Event::new(actor.clone(), input, Utc::now());
        self.store.insert_event(&event).await?;

        info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    #[instrument(skip(self, input), fields(actor = %actor))]
    pub async fn update(
        &self,
        actor: &ActorId,
        id: Uuid,
        input: UpdateEventInput,
    ) -> Result<Event, AppError> {
        if input.is_empty() {
            return Err(AppError::ValidationError(
                "At least one field must be provided".to_string(),
            ));
        }

        let mut event = self.guard.authorize_event_owner(actor, id).await?;
        event.apply(input, Utc::now());
        if !self.store.update_event(&event).await? {
            return Err(AppError::NotFound(format!("Event '{}' was not found", id)));
        }

        info!(event_id = %event.id, status = ?event.status, "Event updated");
        Ok(event)
    }

    /// Delete the event and every task and guest that belongs to it.
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn delete(&self, actor: &ActorId, id: Uuid) -> Result<(), AppError> {
        self.guard.authorize_event_owner(actor, id).await?;

        if !self.store.delete_event_cascade(id).await? {
            return Err(AppError::NotFound(format!("Event '{}' was not found", id)));
        }

        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn list(
        &self,
        actor: &ActorId,
        status: Option<EventStatus>,
    ) -> Result<EventList, AppError> {
        let items = self.store.list_events(actor, status).await?;
        let total = items.len();
        Ok(EventList { items, total })
    }
}
