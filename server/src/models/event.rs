use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::ActorId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Planning,
    Confirmed,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub owner_user_id: ActorId,
    pub title: String,
    pub description: Option<String>,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    /// IANA zone name, stored as given.
    pub time_zone: Option<String>,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub location_map_link: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    #[validate(url(message = "locationMapLink must be a URL"))]
    pub location_map_link: Option<String>,
    pub status: Option<EventStatus>,
}

/// Partial event update. Only the fields that are present are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    #[validate(url(message = "locationMapLink must be a URL"))]
    pub location_map_link: Option<String>,
    pub status: Option<EventStatus>,
}

impl UpdateEventInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_date_time.is_none()
            && self.end_date_time.is_none()
            && self.time_zone.is_none()
            && self.location_name.is_none()
            && self.location_address.is_none()
            && self.location_map_link.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListEventsQuery {
    pub status: Option<EventStatus>,
}

impl Event {
    pub fn new(owner: ActorId, input: CreateEventInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_user_id: owner,
            title: input.title,
            description: input.description,
            start_date_time: input.start_date_time,
            end_date_time: input.end_date_time,
            time_zone: input.time_zone,
            location_name: input.location_name,
            location_address: input.location_address,
            location_map_link: input.location_map_link,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, actor: &ActorId) -> bool {
        &self.owner_user_id == actor
    }

    /// Merge the supplied fields into this record and stamp `updated_at`.
    pub fn apply(&mut self, input: UpdateEventInput, now: DateTime<Utc>) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = Some(description);
        }
        if let Some(start) = input.start_date_time {
            self.start_date_time = Some(start);
        }
        if let Some(end) = input.end_date_time {
            self.end_date_time = Some(end);
        }
        if let Some(time_zone) = input.time_zone {
            self.time_zone = Some(time_zone);
        }
        if let Some(name) = input.location_name {
            self.location_name = Some(name);
        }
        if let Some(address) = input.location_address {
            self.location_address = Some(address);
        }
        if let Some(link) = input.location_map_link {
            self.location_map_link = Some(link);
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}
