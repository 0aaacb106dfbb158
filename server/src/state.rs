use std::sync::Arc;

use axum::http::HeaderName;

use crate::services::{EventService, GuestService, TaskService};
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub tasks: TaskService,
    pub guests: GuestService,
    pub actor_header: HeaderName,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, actor_header: HeaderName) -> Self {
        Self {
            events: EventService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            guests: GuestService::new(store),
            actor_header,
        }
    }
}
