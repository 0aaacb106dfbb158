use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::guard::AccessGuard;
use crate::models::{ActorId, Guest, UpsertGuestInput};
use crate::store::Store;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct GuestService {
    store: Arc<dyn Store>,
    guard: AccessGuard,
}

impl GuestService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            guard: AccessGuard::new(store.clone()),
            store,
        }
    }

    /// Add a guest when `input.id` is absent, otherwise update the stored one.
    #[instrument(skip(self, input), fields(actor = %actor, guest_id = ?input.id))]
    pub async fn upsert(
        &self,
        actor: &ActorId,
        mut input: UpsertGuestInput,
    ) -> Result<Guest, AppError> {
        let Some(id) = input.id else {
            let event_id = input.event_id.ok_or_else(|| {
                AppError::ValidationError("eventId is required to add a guest".to_string())
            })?;
            let name = input.name.take().ok_or_else(|| {
                AppError::ValidationError("name is required to add a guest".to_string())
            })?;

            self.guard.authorize_event_owner(actor, event_id).await?;

            let guest = Guest::new(event_id, name, input, Utc::now());
            if !self.store.insert_guest(&guest).await? {
                return Err(AppError::NotFound(format!(
                    "Event '{}' was not found",
                    event_id
                )));
            }

            info!(guest_id = %guest.id, event_id = %event_id, "Guest added");
            return Ok(guest);
        };

        let claimed_event = match input.event_id {
            Some(event_id) => Some(self.guard.authorize_event_owner(actor, event_id).await?.id),
            None => None,
        };

        let mut guest = self.load(id).await?;

        match claimed_event {
            Some(event_id) if event_id != guest.event_id => {
                return Err(AppError::Forbidden(
                    "Guest does not belong to this event".to_string(),
                ));
            }
            Some(_) => {}
            None => {
                self.guard.authorize_event_owner(actor, guest.event_id).await?;
            }
        }

        guest.apply(input);
        if !self.store.update_guest(&guest).await? {
            return Err(not_found(id));
        }

        info!(
            guest_id = %guest.id,
            event_id = %guest.event_id,
            rsvp = ?guest.rsvp_status,
            "Guest updated"
        );
        Ok(guest)
    }

    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn delete(&self, actor: &ActorId, id: Uuid) -> Result<(), AppError> {
        let guest = self.load(id).await?;
        self.guard.authorize_event_owner(actor, guest.event_id).await?;

        if !self.store.delete_guest(id).await? {
            return Err(not_found(id));
        }

        info!(guest_id = %id, event_id = %guest.event_id, "Guest removed");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Guest, AppError> {
        self.store.find_guest(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Guest '{}' was not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RsvpStatus;
    use crate::services::testing::{alice, event_owned_by, mallory, slow_store, store};
    use crate::services::EventService;
    use std::time::Duration;

    fn new_guest(event_id: Uuid, name: &str) -> UpsertGuestInput {
        UpsertGuestInput {
            event_id: Some(event_id),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_rsvp_update_keeps_name() {
        let store = store();
        let event = event_owned_by(&store, &alice(), "Launch").await;
        let service = GuestService::new(store);

        let guest = service
            .upsert(
                &alice(),
                UpsertGuestInput {
                    event_id: Some(event.id),
                    name: Some("Ana".into()),
                    rsvp_status: Some(RsvpStatus::Invited),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = service
            .upsert(
                &alice(),
                UpsertGuestInput {
                    id: Some(guest.id),
                    rsvp_status: Some(RsvpStatus::Going),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, guest.id);
        assert_eq!(updated.rsvp_status, Some(RsvpStatus::Going));
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.created_at, guest.created_at);
    }

    #[tokio::test]
    async fn test_add_requires_name() {
        let store = store();
        let event = event_owned_by(&store, &alice(), "Launch").await;
        let service = GuestService::new(store.clone());

        let err = service
            .upsert(
                &alice(),
                UpsertGuestInput {
                    event_id: Some(event.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(store.list_guests(event.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guest_cannot_be_moved_between_events() {
        let store = store();
        let launch = event_owned_by(&store, &alice(), "Launch").await;
        let retro = event_owned_by(&store, &alice(), "Retro").await;
        let service = GuestService::new(store.clone());
        let guest = service
            .upsert(
                &alice(),
                UpsertGuestInput {
                    event_id: Some(launch.id),
                    name: Some("Ana".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service
            .upsert(
                &alice(),
                UpsertGuestInput {
                    id: Some(guest.id),
                    event_id: Some(retro.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(store.find_guest(guest.id).await.unwrap().unwrap(), guest);
    }

    #[tokio::test]
    async fn test_only_owner_may_remove_guest() {
        let store = store();
        let event = event_owned_by(&store, &alice(), "Launch").await;
        let service = GuestService::new(store.clone());
        let guest = service
            .upsert(
                &alice(),
                UpsertGuestInput {
                    event_id: Some(event.id),
                    name: Some("Ana".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service.delete(&mallory(), guest.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        service.delete(&alice(), guest.id).await.unwrap();
        let err = service.delete(&alice(), guest.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let store = store();
        let event = event_owned_by(&store, &alice(), "Launch").await;
        let service = GuestService::new(store);

        let first = service.upsert(&alice(), new_guest(event.id, "Ana")).await.unwrap();
        let second = service.upsert(&alice(), new_guest(event.id, "Ana")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.event_id, event.id);
        assert_eq!(first.rsvp_status, None);
    }

    #[tokio::test]
    async fn test_create_on_foreign_event_is_forbidden() {
        let store = store();
        let event = event_owned_by(&store, &alice(), "Launch").await;
        let service = GuestService::new(store.clone());

        let err = service
            .upsert(&mallory(), new_guest(event.id, "Gatecrasher"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(store.list_guests(event.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_through_own_event_cannot_reach_foreign_guest() {
        let store = store();
        let victim = event_owned_by(&store, &alice(), "Launch").await;
        let decoy = event_owned_by(&store, &mallory(), "Decoy").await;
        let service = GuestService::new(store.clone());
        let guest = service.upsert(&alice(), new_guest(victim.id, "Ana")).await.unwrap();

        for event_id in [Some(decoy.id), None] {
            let err = service
                .upsert(
                    &mallory(),
                    UpsertGuestInput {
                        id: Some(guest.id),
                        event_id,
                        rsvp_status: Some(RsvpStatus::Declined),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
        }

        let stored = store.find_guest(guest.id).await.unwrap().unwrap();
        assert_eq!(stored, guest);
    }

    #[tokio::test]
    async fn test_update_unknown_guest_is_not_found() {
        let store = store();
        let event = event_owned_by(&store, &alice(), "Launch").await;
        let service = GuestService::new(store);

        let err = service
            .upsert(
                &alice(),
                UpsertGuestInput {
                    id: Some(Uuid::new_v4()),
                    event_id: Some(event.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_racing_event_delete_leaves_no_orphan() {
        let store = slow_store(Duration::from_millis(50));
        let event = event_owned_by(&store, &alice(), "Launch").await;
        let guests = GuestService::new(store.clone());
        let events = EventService::new(store.clone());

        let user = alice();
        let (added, deleted) = tokio::join!(
            guests.upsert(&user, new_guest(event.id, "Ana")),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                events.delete(&alice(), event.id).await
            }
        );

        deleted.unwrap();
        assert!(matches!(added.unwrap_err(), AppError::NotFound(_)));
        assert!(store.list_guests(event.id).await.unwrap().is_empty());
    }
}
