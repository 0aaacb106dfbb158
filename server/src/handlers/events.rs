use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{CreateEventInput, Event, ListEventsQuery, UpdateEventInput};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::ValidJson;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
struct EventPayload {
    event: Event,
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ValidJson(input): ValidJson<CreateEventInput>,
) -> Result<Response, AppError> {
    let event = state.events.create(&actor, input).await?;
    Ok(created(EventPayload { event }, "Event created"))
}

/// GET /events?status=
pub async fn list_my_events(
    State(state): State<AppState>,
    Actor(actor): Actor,
    query: Result<Query<ListEventsQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let list = state.events.list(&actor, query.status).await?;
    Ok(success(list, "Events retrieved"))
}

/// GET /events/:id
pub async fn get_event_with_details(
    State(state): State<AppState>,
    Actor(actor): Actor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let details = state.events.get_details(&actor, id).await?;
    Ok(success(details, "Event retrieved"))
}

/// PATCH /events/:id
pub async fn update_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    id: Result<Path<Uuid>, PathRejection>,
    ValidJson(input): ValidJson<UpdateEventInput>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let event = state.events.update(&actor, id, input).await?;
    Ok(success(EventPayload { event }, "Event updated"))
}

/// DELETE /events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    state.events.delete(&actor, id).await?;
    Ok(empty_success("Event deleted"))
}
