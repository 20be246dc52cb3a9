//! Event Entity
//!
//! A bookable event owned by the user who created it.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: Option<String>,
    /// Id of the creating user; the only principal allowed to mutate
    pub creator_id: String,
}

/// Caller-supplied fields for a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: Option<String>,
}

/// Cut a timestamp to whole milliseconds, the resolution the document
/// store keeps.
pub fn to_store_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(3)
}

impl Event {
    pub fn new(fields: NewEvent, creator_id: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            name: fields.name,
            date: to_store_precision(fields.date),
            location: fields.location,
            description: fields.description,
            creator_id: creator_id.into(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.creator_id == user_id
    }
}

/// Partial update. `None` leaves a field unchanged; for `description`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<Option<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.description.is_none()
    }

    pub fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
    }
}
