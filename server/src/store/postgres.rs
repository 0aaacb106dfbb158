use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgQueryResult};
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::models::{ActorId, Event, EventStatus, Guest, Task};

const EVENT_COLUMNS: &str = "id, owner_user_id, title, description, start_date_time, \
    end_date_time, time_zone, location_name, location_address, location_map_link, status, \
    created_at, updated_at";

const TASK_COLUMNS: &str = "id, event_id, user_id, title, description, due_date, status, \
    priority, created_at, updated_at";

const GUEST_COLUMNS: &str = "id, event_id, name, email, phone, rsvp_status, notes, \
    invited_at, responded_at, created_at";

/// A child row rejected by the `event_id` foreign key means the parent event
/// was deleted after the caller authorized it.
fn inserted_under_parent(result: Result<PgQueryResult, sqlx::Error>) -> StoreResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Ok(false),
        Err(e) => Err(e),
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Successfully connected to database");

        sqlx::migrate!().run(&pool).await?;

        tracing::info!("Migrations run successfully");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        let sql = format!(
            "INSERT INTO events ({EVENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        );
        sqlx::query(&sql)
            .bind(event.id)
            .bind(&event.owner_user_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.start_date_time)
            .bind(event.end_date_time)
            .bind(&event.time_zone)
            .bind(&event.location_name)
            .bind(&event.location_address)
            .bind(&event.location_map_link)
            .bind(event.status)
            .bind(event.created_at)
            .bind(event.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE events SET title = $2, description = $3, start_date_time = $4, \
             end_date_time = $5, time_zone = $6, location_name = $7, location_address = $8, \
             location_map_link = $9, status = $10, updated_at = $11 WHERE id = $1",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date_time)
        .bind(event.end_date_time)
        .bind(&event.time_zone)
        .bind(&event.location_name)
        .bind(&event.location_address)
        .bind(&event.location_map_link)
        .bind(event.status)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_event_cascade(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query("DELETE FROM event_tasks WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let guests = sqlx::query("DELETE FROM event_guests WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let event = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            event_id = %id,
            tasks = tasks.rows_affected(),
            guests = guests.rows_affected(),
            "Cascade delete committed"
        );

        Ok(event.rows_affected() > 0)
    }

    async fn list_events(
        &self,
        owner: &ActorId,
        status: Option<EventStatus>,
    ) -> StoreResult<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE owner_user_id = $1 AND ($2::event_status IS NULL OR status = $2) \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(owner)
            .bind(status)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM event_tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<bool> {
        let sql = format!(
            "INSERT INTO event_tasks ({TASK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        let result = sqlx::query(&sql)
            .bind(task.id)
            .bind(task.event_id)
            .bind(&task.user_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.created_at)
            .bind(task.updated_at)
            .execute(&self.pool)
            .await;
        inserted_under_parent(result)
    }

    async fn update_task(&self, task: &Task) -> StoreResult<bool> {
        // event_id is immutable
        let result = sqlx::query(
            "UPDATE event_tasks SET user_id = $2, title = $3, description = $4, due_date = $5, \
             status = $6, priority = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(task.id)
        .bind(&task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM event_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, event_id: Uuid) -> StoreResult<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM event_tasks WHERE event_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_guest(&self, id: Uuid) -> StoreResult<Option<Guest>> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM event_guests WHERE id = $1");
        sqlx::query_as::<_, Guest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_guest(&self, guest: &Guest) -> StoreResult<bool> {
        let sql = format!(
            "INSERT INTO event_guests ({GUEST_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        let result = sqlx::query(&sql)
            .bind(guest.id)
            .bind(guest.event_id)
            .bind(&guest.name)
            .bind(&guest.email)
            .bind(&guest.phone)
            .bind(guest.rsvp_status)
            .bind(&guest.notes)
            .bind(guest.invited_at)
            .bind(guest.responded_at)
            .bind(guest.created_at)
            .execute(&self.pool)
            .await;
        inserted_under_parent(result)
    }

    async fn update_guest(&self, guest: &Guest) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE event_guests SET name = $2, email = $3, phone = $4, rsvp_status = $5, \
             notes = $6, invited_at = $7, responded_at = $8 WHERE id = $1",
        )
        .bind(guest.id)
        .bind(&guest.name)
        .bind(&guest.email)
        .bind(&guest.phone)
        .bind(guest.rsvp_status)
        .bind(&guest.notes)
        .bind(guest.invited_at)
        .bind(guest.responded_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_guest(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM event_guests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_guests(&self, event_id: Uuid) -> StoreResult<Vec<Guest>> {
        let sql = format!(
            "SELECT {GUEST_COLUMNS} FROM event_guests WHERE event_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, Guest>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
    }
}
