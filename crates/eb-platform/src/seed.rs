//! Development data seeder
//!
//! Creates the users listed under `[[dev.users]]` so a fresh store can be
//! logged into. Existing usernames are left untouched, so seeding on every
//! start is safe.

use std::sync::Arc;

use eb_common::DevUser;
use tracing::{debug, info};

use crate::domain::User;
use crate::error::Result;
use crate::repository::UserRepository;
use crate::service::PasswordService;

pub struct DevDataSeeder {
    user_repo: Arc<dyn UserRepository>,
    password_service: Arc<PasswordService>,
}

impl DevDataSeeder {
    pub fn new(user_repo: Arc<dyn UserRepository>, password_service: Arc<PasswordService>) -> Self {
        Self {
            user_repo,
            password_service,
        }
    }

    /// Insert each missing user. Returns how many were created.
    pub async fn seed(&self, users: &[DevUser]) -> Result<usize> {
        let mut created = 0;

        for dev_user in users {
            if self.user_repo.find_by_username(&dev_user.username).await?.is_some() {
                debug!(username = %dev_user.username, "Dev user already present");
                continue;
            }

            let hash = self.password_service.hash_password(&dev_user.password)?;
            let user = User::new(&dev_user.username, &dev_user.email, hash);
            self.user_repo.insert(&user).await?;
            created += 1;
        }

        info!(created, total = users.len(), "Dev users seeded");
        Ok(created)
    }
}
