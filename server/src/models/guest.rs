use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "rsvp_status", rename_all = "lowercase")]
pub enum RsvpStatus {
    Invited,
    Going,
    Maybe,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rsvp_status: Option<RsvpStatus>,
    pub notes: Option<String>,
    pub invited_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Create-or-update payload for a guest. Same keying rules as tasks.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGuestInput {
    pub id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be an email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rsvp_status: Option<RsvpStatus>,
    pub notes: Option<String>,
    pub invited_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Guest {
    pub fn new(event_id: Uuid, name: String, input: UpsertGuestInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name,
            email: input.email,
            phone: input.phone,
            rsvp_status: input.rsvp_status,
            notes: input.notes,
            invited_at: input.invited_at,
            responded_at: input.responded_at,
            created_at: now,
        }
    }

    /// Merge the supplied fields into this record. `id`, `event_id` and `created_at` never change.
    pub fn apply(&mut self, input: UpsertGuestInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(email) = input.email {
            self.email = Some(email);
        }
        if let Some(phone) = input.phone {
            self.phone = Some(phone);
        }
        if let Some(rsvp_status) = input.rsvp_status {
            self.rsvp_status = Some(rsvp_status);
        }
        if let Some(notes) = input.notes {
            self.notes = Some(notes);
        }
        if let Some(invited_at) = input.invited_at {
            self.invited_at = Some(invited_at);
        }
        if let Some(responded_at) = input.responded_at {
            self.responded_at = Some(responded_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsvp_change_keeps_name() {
        let mut guest = Guest::new(
            Uuid::new_v4(),
            "Ana".into(),
            UpsertGuestInput {
                rsvp_status: Some(RsvpStatus::Invited),
                ..Default::default()
            },
            Utc::now(),
        );
        let created_at = guest.created_at;

        guest.apply(UpsertGuestInput {
            rsvp_status: Some(RsvpStatus::Going),
            ..Default::default()
        });

        assert_eq!(guest.name, "Ana");
        assert_eq!(guest.rsvp_status, Some(RsvpStatus::Going));
        assert_eq!(guest.created_at, created_at);
    }

    #[test]
    fn test_email_rule() {
        let input = UpsertGuestInput {
            name: Some("Ana".into()),
            email: Some("ana-at-example".into()),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = UpsertGuestInput {
            name: Some("Ana".into()),
            email: Some("ana@example.com".into()),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }
}
