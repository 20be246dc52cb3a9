//! Event Service
//!
//! CRUD over the event store. Reads are open to any authenticated user;
//! update and delete are restricted to the event's creator.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Event, EventPatch, NewEvent, User};
use crate::error::{PlatformError, Result};
use crate::repository::EventRepository;

pub struct EventService {
    event_repo: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(event_repo: Arc<dyn EventRepository>) -> Self {
        Self { event_repo }
    }

    /// Persist a new event owned by `actor`.
    pub async fn create(&self, fields: NewEvent, actor: &User) -> Result<Event> {
        let event = Event::new(fields, &actor.id);
        self.event_repo.insert(&event).await?;

        info!(event_id = %event.id, creator_id = %actor.id, "Event created");
        Ok(event)
    }

    /// Every event, regardless of owner.
    pub async fn list(&self, _actor: &User) -> Result<Vec<Event>> {
        self.event_repo.find_all().await
    }

    pub async fn get(&self, id: &str, _actor: &User) -> Result<Event> {
        self.event_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Event", id))
    }

    /// Merge `patch` into the event. Omitted fields are left as stored.
    pub async fn update(&self, id: &str, patch: EventPatch, actor: &User) -> Result<Event> {
        self.get_owned(id, actor, "update").await?;

        let updated = self
            .event_repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| PlatformError::not_found("Event", id))?;

        info!(event_id = %id, user_id = %actor.id, "Event updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str, actor: &User) -> Result<()> {
        self.get_owned(id, actor, "delete").await?;

        if !self.event_repo.delete(id).await? {
            return Err(PlatformError::not_found("Event", id));
        }

        info!(event_id = %id, user_id = %actor.id, "Event deleted");
        Ok(())
    }

    /// Existence first, then ownership.
    async fn get_owned(&self, id: &str, actor: &User, action: &str) -> Result<Event> {
        let event = self.get(id, actor).await?;
        if !event.is_owned_by(&actor.id) {
            warn!(event_id = %id, user_id = %actor.id, action, "Ownership check failed");
            return Err(PlatformError::forbidden(format!(
                "Not authorized to {} this event",
                action
            )));
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryEventRepository;
    use chrono::{TimeZone, Utc};

    fn alice() -> User {
        User::new("alice", "alice@example.com", "h")
    }

    fn bob() -> User {
        User::new("bob", "bob@example.com", "h")
    }

    fn conf() -> NewEvent {
        NewEvent {
            name: "Conf".to_string(),
            date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            location: "NYC".to_string(),
            description: Some("Yearly".to_string()),
        }
    }

    fn service() -> EventService {
        EventService::new(Arc::new(InMemoryEventRepository::new()))
    }

    #[tokio::test]
    async fn test_create_sets_creator() {
        let svc = service();
        let alice = alice();
        let event = svc.create(conf(), &alice).await.unwrap();
        assert_eq!(event.creator_id, alice.id);
        assert_eq!(svc.get(&event.id, &alice).await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_list_shows_all_owners() {
        let svc = service();
        let (alice, bob) = (alice(), bob());
        svc.create(conf(), &alice).await.unwrap();
        svc.create(conf(), &bob).await.unwrap();
        assert_eq!(svc.list(&alice).await.unwrap().len(), 2);
        assert_eq!(svc.list(&bob).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get("656f1f77bcf86cd799439011", &alice()).await,
            Err(PlatformError::NotFound { .. })
        ));
        assert!(matches!(
            svc.get("not-an-id", &alice()).await,
            Err(PlatformError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let svc = service();
        let (alice, bob) = (alice(), bob());
        let event = svc.create(conf(), &alice).await.unwrap();

        let patch = EventPatch {
            name: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update(&event.id, patch, &bob).await,
            Err(PlatformError::Forbidden { .. })
        ));
        assert!(matches!(
            svc.delete(&event.id, &bob).await,
            Err(PlatformError::Forbidden { .. })
        ));
        assert_eq!(svc.get(&event.id, &alice).await.unwrap().name, "Conf");
    }

    #[tokio::test]
    async fn test_missing_beats_forbidden() {
        let svc = service();
        assert!(matches!(
            svc.delete("656f1f77bcf86cd799439011", &bob()).await,
            Err(PlatformError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let svc = service();
        let alice = alice();
        let event = svc.create(conf(), &alice).await.unwrap();

        let patch = EventPatch {
            location: Some("Boston".to_string()),
            ..Default::default()
        };
        let updated = svc.update(&event.id, patch, &alice).await.unwrap();

        assert_eq!(updated.location, "Boston");
        assert_eq!(updated.name, event.name);
        assert_eq!(updated.date, event.date);
        assert_eq!(updated.description, event.description);
        assert_eq!(updated.creator_id, alice.id);
    }

    #[tokio::test]
    async fn test_empty_update_is_noop() {
        let svc = service();
        let alice = alice();
        let event = svc.create(conf(), &alice).await.unwrap();
        let updated = svc.update(&event.id, EventPatch::default(), &alice).await.unwrap();
        assert_eq!(updated, event);
    }

    #[tokio::test]
    async fn test_owner_delete_removes() {
        let svc = service();
        let alice = alice();
        let event = svc.create(conf(), &alice).await.unwrap();
        svc.delete(&event.id, &alice).await.unwrap();
        assert!(matches!(
            svc.get(&event.id, &alice).await,
            Err(PlatformError::NotFound { .. })
        ));
    }
}
