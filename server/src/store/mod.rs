//! Persistence for events and their tasks and guests.
//!
//! Services only see the [`Store`] trait. [`PgStore`] is the production
//! backend; [`MemoryStore`] keeps everything in process and backs local
//! development and the test suite.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ActorId, Event, EventStatus, Guest, Task};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_event(&self, id: Uuid) -> StoreResult<Option<Event>>;

    async fn insert_event(&self, event: &Event) -> StoreResult<()>;

    /// Returns `false` when the event no longer exists.
    async fn update_event(&self, event: &Event) -> StoreResult<bool>;

    /// Remove an event together with all of its tasks and guests, atomically.
    /// Returns `false` when no event with that id existed.
    async fn delete_event_cascade(&self, id: Uuid) -> StoreResult<bool>;

    /// Events owned by `owner`, oldest first, optionally restricted to one status.
    async fn list_events(
        &self,
        owner: &ActorId,
        status: Option<EventStatus>,
    ) -> StoreResult<Vec<Event>>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Returns `false`, writing nothing, when the parent event no longer exists.
    async fn insert_task(&self, task: &Task) -> StoreResult<bool>;

    /// Returns `false` when the task no longer exists.
    async fn update_task(&self, task: &Task) -> StoreResult<bool>;

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_tasks(&self, event_id: Uuid) -> StoreResult<Vec<Task>>;

    async fn find_guest(&self, id: Uuid) -> StoreResult<Option<Guest>>;

    /// Returns `false`, writing nothing, when the parent event no longer exists.
    async fn insert_guest(&self, guest: &Guest) -> StoreResult<bool>;

    /// Returns `false` when the guest no longer exists.
    async fn update_guest(&self, guest: &Guest) -> StoreResult<bool>;

    async fn delete_guest(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_guests(&self, event_id: Uuid) -> StoreResult<Vec<Guest>>;
}
