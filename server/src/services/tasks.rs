use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::guard::AccessGuard;
use crate::models::{ActorId, Task, UpsertTaskInput};
use crate::store::Store;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
    guard: AccessGuard,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            guard: AccessGuard::new(store.clone()),
            store,
        }
    }

    /// Create a task when `input.id` is absent, otherwise update the stored one.
    #[instrument(skip(self, input), fields(actor = %actor, task_id = ?input.id))]
    pub async fn upsert(
        &self,
        actor: &ActorId,
        mut input: UpsertTaskInput,
    ) -> Result<Task, AppError> {
        let Some(id) = input.id else {
            let event_id = input.event_id.ok_or_else(|| {
                AppError::ValidationError("eventId is required to create a task".to_string())
            })?;
            let title = input.title.take().ok_or_else(|| {
                AppError::ValidationError("title is required to create a task".to_string())
            })?;

            self.guard.authorize_event_owner(actor, event_id).await?;

            let task = Task::new(event_id, title, input, Utc::now());
            if !self.store.insert_task(&task).await? {
                return Err(AppError::NotFound(format!(
                    "Event '{}' was not found",
                    event_id
                )));
            }

            info!(task_id = %task.id, event_id = %event_id, "Task created");
            return Ok(task);
        };

        let claimed_event = match input.event_id {
            Some(event_id) => Some(self.guard.authorize_event_owner(actor, event_id).await?.id),
            None => None,
        };

        let mut task = self.load(id).await?;

        match claimed_event {
            Some(event_id) if event_id != task.event_id => {
                return Err(AppError::Forbidden(
                    "Task does not belong to this event".to_string(),
                ));
            }
            Some(_) => {}
            None => {
                self.guard.authorize_event_owner(actor, task.event_id).await?;
            }
        }

        task.apply(input, Utc::now());
        if !self.store.update_task(&task).await? {
            return Err(not_found(id));
        }

        info!(task_id = %task.id, event_id = %task.event_id, "Task updated");
        Ok(task)
    }

    /// Delete a task. Ownership is checked against the task's stored event.
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn delete(&self, actor: &ActorId, id: Uuid) -> Result<(), AppError> {
        let task = self.load(id).await?;
        self.guard.authorize_event_owner(actor, task.event_id).await?;

        if !self.store.delete_task(id).await? {
            return Err(not_found(id));
        }

        info!(task_id = %id, event_id = %task.event_id, "Task deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Task, AppError> {
        self.store.find_task(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Task '{}' was not found", id))
}
