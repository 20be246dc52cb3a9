//! User Repository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

use super::UserRepository;
use crate::domain::User;
use crate::error::{PlatformError, Result};

/// Stored shape of a user in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            username: doc.username,
            email: doc.email,
            password_hash: doc.password_hash,
        }
    }
}

impl TryFrom<&User> for UserDocument {
    type Error = PlatformError;

    fn try_from(user: &User) -> Result<Self> {
        let id = ObjectId::parse_str(&user.id)
            .map_err(|_| PlatformError::internal(format!("User id is not an ObjectId: {}", user.id)))?;
        Ok(Self {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        })
    }
}

pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    /// Usernames are the login key, so they must be unique.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("username_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == 11000
    )
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        match self.collection.insert_one(UserDocument::try_from(user)?).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                Err(PlatformError::duplicate("User", "username", &user.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let found = self.collection.find_one(doc! { "username": username }).await?;
        Ok(found.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip_keeps_hex_id() {
        let user = User::new("alice", "alice@example.com", "$argon2id$stub");
        let doc = UserDocument::try_from(&user).unwrap();
        assert_eq!(doc.id.to_hex(), user.id);
        assert_eq!(User::from(doc), user);
    }

    #[test]
    fn test_document_serializes_underscore_id() {
        let user = User::new("alice", "alice@example.com", "hash");
        let bson = bson::to_document(&UserDocument::try_from(&user).unwrap()).unwrap();
        assert!(bson.get_object_id("_id").is_ok());
        assert_eq!(bson.get_str("username").unwrap(), "alice");
    }

    #[test]
    fn test_non_hex_id_rejected() {
        let mut user = User::new("alice", "alice@example.com", "hash");
        user.id = "not-an-oid".to_string();
        assert!(UserDocument::try_from(&user).is_err());
    }

    #[tokio::test]
    async fn test_malformed_id_is_absent_without_store_access() {
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:1").await.unwrap();
        let repo = MongoUserRepository::new(&client.database("eb_test"));
        assert!(repo.find_by_id("not-an-object-id").await.unwrap().is_none());
    }
}
