//! Event Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

use super::EventRepository;
use crate::domain::{Event, EventPatch};
use crate::error::{PlatformError, Result};

/// Stored shape of an event in the `events` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator_id: String,
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            date: doc.date,
            location: doc.location,
            description: doc.description,
            creator_id: doc.creator_id,
        }
    }
}

impl TryFrom<&Event> for EventDocument {
    type Error = PlatformError;

    fn try_from(event: &Event) -> Result<Self> {
        let id = ObjectId::parse_str(&event.id)
            .map_err(|_| PlatformError::internal(format!("Event id is not an ObjectId: {}", event.id)))?;
        Ok(Self {
            id,
            name: event.name.clone(),
            date: event.date,
            location: event.location.clone(),
            description: event.description.clone(),
            creator_id: event.creator_id.clone(),
        })
    }
}

/// Build the `$set` body for a patch. Only provided fields appear.
fn set_document(patch: &EventPatch) -> Document {
    let mut set = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(date) = patch.date {
        set.insert("date", bson::DateTime::from_chrono(date));
    }
    if let Some(location) = &patch.location {
        set.insert("location", location.as_str());
    }
    if let Some(description) = &patch.description {
        let value = match description {
            Some(text) => Bson::String(text.clone()),
            None => Bson::Null,
        };
        set.insert("description", value);
    }
    set
}

pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("events"),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "creator_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("creator_id".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    async fn insert(&self, event: &Event) -> Result<()> {
        self.collection.insert_one(EventDocument::try_from(event)?).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(Event::from))
    }

    async fn find_all(&self) -> Result<Vec<Event>> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<EventDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Event::from).collect())
    }

    async fn update(&self, id: &str, patch: &EventPatch) -> Result<Option<Event>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        // An empty $set is rejected by the server
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set_document(patch) })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(Event::from))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewEvent;
    use chrono::TimeZone;

    fn sample() -> Event {
        Event::new(
            NewEvent {
                name: "Conf".to_string(),
                date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                location: "NYC".to_string(),
                description: None,
            },
            "656f1f77bcf86cd799439011",
        )
    }

    #[test]
    fn test_document_stores_native_date() {
        let doc = bson::to_document(&EventDocument::try_from(&sample()).unwrap()).unwrap();
        assert!(doc.get_datetime("date").is_ok());
        assert!(doc.get_object_id("_id").is_ok());
        assert_eq!(doc.get_str("creator_id").unwrap(), "656f1f77bcf86cd799439011");
    }

    #[test]
    fn test_document_round_trip() {
        let event = sample();
        let doc = EventDocument::try_from(&event).unwrap();
        let raw = bson::to_document(&doc).unwrap();
        let back: EventDocument = bson::from_document(raw).unwrap();
        assert_eq!(Event::from(back), event);
    }

    #[test]
    fn test_set_document_only_includes_given_fields() {
        let patch = EventPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let set = set_document(&patch);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("name").unwrap(), "Renamed");
    }

    #[test]
    fn test_set_document_clears_description_with_null() {
        let patch = EventPatch {
            description: Some(None),
            ..Default::default()
        };
        let set = set_document(&patch);
        assert_eq!(set.get("description"), Some(&Bson::Null));
    }

    #[test]
    fn test_document_round_trip_keeps_sub_second_date() {
        let fields = NewEvent {
            name: "Conf".to_string(),
            date: "2025-01-01T00:00:00.123456Z".parse().unwrap(),
            location: "NYC".to_string(),
            description: Some("Keynote".to_string()),
        };
        let event = Event::new(fields, "656f1f77bcf86cd799439011");
        let raw = bson::to_document(&EventDocument::try_from(&event).unwrap()).unwrap();
        let back: EventDocument = bson::from_document(raw).unwrap();
        assert_eq!(Event::from(back), event);
    }

    async fn unconnected_repo() -> MongoEventRepository {
        // Parsing a plain URI does not open a connection.
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:1").await.unwrap();
        MongoEventRepository::new(&client.database("eb_test"))
    }

    #[tokio::test]
    async fn test_malformed_id_is_absent_without_store_access() {
        let repo = unconnected_repo().await;
        let patch = EventPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };

        assert!(repo.find_by_id("not-an-object-id").await.unwrap().is_none());
        assert!(repo.update("not-an-object-id", &patch).await.unwrap().is_none());
        assert!(!repo.delete("not-an-object-id").await.unwrap());
    }
}
