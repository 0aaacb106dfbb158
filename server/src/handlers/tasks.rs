use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Task, UpsertTaskInput};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::ValidJson;
use crate::utils::response::{empty_success, success};

#[derive(Serialize)]
struct TaskPayload {
    task: Task,
}

/// PUT /tasks
pub async fn upsert_event_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ValidJson(input): ValidJson<UpsertTaskInput>,
) -> Result<Response, AppError> {
    let task = state.tasks.upsert(&actor, input).await?;
    Ok(success(TaskPayload { task }, "Task saved"))
}

/// DELETE /tasks/:id
pub async fn delete_event_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    state.tasks.delete(&actor, id).await?;
    Ok(empty_success("Task deleted"))
}
