use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use super::events::EventService;
use crate::models::{ActorId, Event, Guest, Task};
use crate::utils::error::AppError;

/// An event with all of its tasks and guests.
#[derive(Debug, Serialize)]
pub struct EventDetails {
    pub event: Event,
    pub tasks: Vec<Task>,
    pub guests: Vec<Guest>,
}

impl EventService {
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn get_details(&self, actor: &ActorId, id: Uuid) -> Result<EventDetails, AppError> {
        let event = self.guard.authorize_event_owner(actor, id).await?;

        let (tasks, guests) =
            tokio::try_join!(self.store.list_tasks(id), self.store.list_guests(id))?;

        Ok(EventDetails {
            event,
            tasks,
            guests,
        })
    }
}
