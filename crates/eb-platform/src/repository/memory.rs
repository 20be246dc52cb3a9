//! In-memory repositories
//!
//! Backing store for `storage = "memory"` and for tests. Each operation
//! takes the lock once, so single-record operations are atomic like the
//! document store's.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{EventRepository, UserRepository};
use crate::domain::{Event, EventPatch, User};
use crate::error::{PlatformError, Result};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    /// Drop a user, e.g. to simulate an account removed after token issue.
    pub fn remove(&self, id: &str) -> Option<User> {
        self.users.write().remove(id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write();
        if users.values().any(|u| u.username == user.username) {
            return Err(PlatformError::duplicate("User", "username", &user.username));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// Events keyed by id; ids are time-ordered so iteration follows creation.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<BTreeMap<String, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write();
        if events.contains_key(&event.id) {
            return Err(PlatformError::duplicate("Event", "id", &event.id));
        }
        events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.read().get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().values().cloned().collect())
    }

    async fn update(&self, id: &str, patch: &EventPatch) -> Result<Option<Event>> {
        let mut events = self.events.write();
        Ok(events.get_mut(id).map(|event| {
            patch.apply_to(event);
            event.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.events.write().remove(id).is_some())
    }
}
