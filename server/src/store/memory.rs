use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::models::{ActorId, Event, EventStatus, Guest, Task};

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    tasks: HashMap<Uuid, Task>,
    guests: HashMap<Uuid, Guest>,
}

/// In-process store. All three collections sit behind one lock, so every
/// operation (including the cascade delete) is atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.events.get_mut(&event.id) {
            Some(stored) => {
                *stored = event.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_event_cascade(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        tables.tasks.retain(|_, task| task.event_id != id);
        tables.guests.retain(|_, guest| guest.event_id != id);
        Ok(tables.events.remove(&id).is_some())
    }

    async fn list_events(
        &self,
        owner: &ActorId,
        status: Option<EventStatus>,
    ) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|event| &event.owner_user_id == owner)
            .filter(|event| status.map_or(true, |status| event.status == status))
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.created_at, event.id));
        Ok(events)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&task.event_id) {
            return Ok(false);
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(true)
    }

    async fn update_task(&self, task: &Task) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.tasks.get_mut(&task.id) {
            Some(stored) => {
                let event_id = stored.event_id;
                *stored = Task {
                    event_id,
                    ..task.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }

    async fn list_tasks(&self, event_id: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|task| task.event_id == event_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at, task.id));
        Ok(tasks)
    }

    async fn find_guest(&self, id: Uuid) -> StoreResult<Option<Guest>> {
        Ok(self.tables.read().await.guests.get(&id).cloned())
    }

    async fn insert_guest(&self, guest: &Guest) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&guest.event_id) {
            return Ok(false);
        }
        tables.guests.insert(guest.id, guest.clone());
        Ok(true)
    }

    async fn update_guest(&self, guest: &Guest) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.guests.get_mut(&guest.id) {
            Some(stored) => {
                let event_id = stored.event_id;
                *stored = Guest {
                    event_id,
                    ..guest.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_guest(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.guests.remove(&id).is_some())
    }

    async fn list_guests(&self, event_id: Uuid) -> StoreResult<Vec<Guest>> {
        let tables = self.tables.read().await;
        let mut guests: Vec<Guest> = tables
            .guests
            .values()
            .filter(|guest| guest.event_id == event_id)
            .cloned()
            .collect();
        guests.sort_by_key(|guest| (guest.created_at, guest.id));
        Ok(guests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateEventInput, UpsertGuestInput, UpsertTaskInput};
    use chrono::Utc;

    fn event_for(owner: &str, title: &str) -> Event {
        Event::new(
            ActorId::new(owner),
            CreateEventInput {
                title: title.into(),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_cascade_delete_leaves_no_children() {
        let store = MemoryStore::new();
        let doomed = event_for("alice", "Launch");
        let kept = event_for("alice", "Retro");
        store.insert_event(&doomed).await.unwrap();
        store.insert_event(&kept).await.unwrap();

        for (event_id, title) in [(doomed.id, "a"), (doomed.id, "b"), (kept.id, "c")] {
            let task = Task::new(event_id, title.into(), UpsertTaskInput::default(), Utc::now());
            store.insert_task(&task).await.unwrap();
        }
        let guest = Guest::new(doomed.id, "Ana".into(), UpsertGuestInput::default(), Utc::now());
        store.insert_guest(&guest).await.unwrap();

        assert!(store.delete_event_cascade(doomed.id).await.unwrap());

        assert!(store.find_event(doomed.id).await.unwrap().is_none());
        assert!(store.list_tasks(doomed.id).await.unwrap().is_empty());
        assert!(store.list_guests(doomed.id).await.unwrap().is_empty());
        assert_eq!(store.list_tasks(kept.id).await.unwrap().len(), 1);

        assert!(!store.delete_event_cascade(doomed.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_events_filters_by_owner_and_status() {
        let store = MemoryStore::new();
        let mut confirmed = event_for("alice", "Launch");
        confirmed.status = EventStatus::Confirmed;
        store.insert_event(&confirmed).await.unwrap();
        store.insert_event(&event_for("alice", "Retro")).await.unwrap();
        store.insert_event(&event_for("bob", "Offsite")).await.unwrap();

        let alice = ActorId::new("alice");
        assert_eq!(store.list_events(&alice, None).await.unwrap().len(), 2);

        let only_confirmed = store
            .list_events(&alice, Some(EventStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(only_confirmed, vec![confirmed]);
    }

    #[tokio::test]
    async fn test_update_task_never_moves_it() {
        let store = MemoryStore::new();
        let launch = event_for("alice", "Launch");
        store.insert_event(&launch).await.unwrap();
        let mut task = Task::new(
            launch.id,
            "Book venue".into(),
            UpsertTaskInput::default(),
            Utc::now(),
        );
        assert!(store.insert_task(&task).await.unwrap());

        task.event_id = Uuid::new_v4();
        task.title = "Book bigger venue".into();
        assert!(store.update_task(&task).await.unwrap());

        let stored = store.find_task(task.id).await.unwrap().unwrap();
        assert_eq!(stored.event_id, launch.id);
        assert_eq!(stored.title, "Book bigger venue");
    }

    #[tokio::test]
    async fn test_delete_task_reports_absence() {
        let store = MemoryStore::new();
        let launch = event_for("alice", "Launch");
        store.insert_event(&launch).await.unwrap();
        let task = Task::new(launch.id, "x".into(), UpsertTaskInput::default(), Utc::now());
        store.insert_task(&task).await.unwrap();

        assert!(store.delete_task(task.id).await.unwrap());
        assert!(!store.delete_task(task.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_children_need_an_existing_event() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();

        let task = Task::new(missing, "x".into(), UpsertTaskInput::default(), Utc::now());
        assert!(!store.insert_task(&task).await.unwrap());
        let guest = Guest::new(missing, "Ana".into(), UpsertGuestInput::default(), Utc::now());
        assert!(!store.insert_guest(&guest).await.unwrap());

        assert!(store.find_task(task.id).await.unwrap().is_none());
        assert!(store.find_guest(guest.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_updates_report_vanished_rows() {
        let store = MemoryStore::new();
        let launch = event_for("alice", "Launch");
        store.insert_event(&launch).await.unwrap();
        let task = Task::new(launch.id, "x".into(), UpsertTaskInput::default(), Utc::now());
        let guest = Guest::new(launch.id, "Ana".into(), UpsertGuestInput::default(), Utc::now());
        store.insert_task(&task).await.unwrap();
        store.insert_guest(&guest).await.unwrap();

        store.delete_event_cascade(launch.id).await.unwrap();

        assert!(!store.update_event(&launch).await.unwrap());
        assert!(!store.update_task(&task).await.unwrap());
        assert!(!store.update_guest(&guest).await.unwrap());
        assert!(store.find_event(launch.id).await.unwrap().is_none());
    }
}
