use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::events::{
    create_event, delete_event, get_event_with_details, list_my_events, update_event,
};
use crate::handlers::guests::{delete_event_guest, upsert_event_guest};
use crate::handlers::health_check;
use crate::handlers::tasks::{delete_event_task, upsert_event_task};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", get(list_my_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event_with_details)
                .patch(update_event)
                .delete(delete_event),
        )
        .route("/tasks", put(upsert_event_task))
        .route("/tasks/:id", delete(delete_event_task))
        .route("/guests", put(upsert_event_guest))
        .route("/guests/:id", delete(delete_event_guest))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config))
        .layer(create_cors_layer(config))
}
