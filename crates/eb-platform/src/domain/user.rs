//! User Entity

use serde::{Deserialize, Serialize};

/// A registered user. Users are created out-of-band (see the dev seeder)
/// and never mutated by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
