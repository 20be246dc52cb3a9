//! Repository Layer
//!
//! Storage traits for users and events, with MongoDB implementations and
//! process-local in-memory implementations for development and tests.

pub mod event;
pub mod memory;
pub mod user;

use async_trait::async_trait;

use crate::domain::{Event, EventPatch, User};
use crate::error::Result;

pub use event::{EventDocument, MongoEventRepository};
pub use memory::{InMemoryEventRepository, InMemoryUserRepository};
pub use user::{MongoUserRepository, UserDocument};

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Event store. Every call is a single-document operation.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: &Event) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>>;
    async fn find_all(&self) -> Result<Vec<Event>>;
    /// Apply `patch` and return the merged record, or `None` if the event is gone.
    async fn update(&self, id: &str, patch: &EventPatch) -> Result<Option<Event>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}
