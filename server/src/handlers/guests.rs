use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Guest, UpsertGuestInput};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::ValidJson;
use crate::utils::response::{empty_success, success};

#[derive(Serialize)]
struct GuestPayload {
    guest: Guest,
}

/// PUT /guests
pub async fn upsert_event_guest(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ValidJson(input): ValidJson<UpsertGuestInput>,
) -> Result<Response, AppError> {
    let guest = state.guests.upsert(&actor, input).await?;
    Ok(success(GuestPayload { guest }, "Guest saved"))
}

/// DELETE /guests/:id
pub async fn delete_event_guest(
    State(state): State<AppState>,
    Actor(actor): Actor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    state.guests.delete(&actor, id).await?;
    Ok(empty_success("Guest removed"))
}
