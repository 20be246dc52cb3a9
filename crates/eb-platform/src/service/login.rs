//! Login Service

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{PlatformError, Result};
use crate::repository::UserRepository;
use crate::service::auth::AuthService;
use crate::service::password::PasswordService;

pub struct LoginService {
    user_repo: Arc<dyn UserRepository>,
    password_service: Arc<PasswordService>,
    auth_service: Arc<AuthService>,
    /// Verified against when the username is unknown, so both failure paths
    /// pay for one Argon2 run.
    dummy_hash: Option<String>,
}

impl LoginService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_service: Arc<PasswordService>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let dummy_hash = password_service
            .hash_password("unknown-user-placeholder")
            .map_err(|e| warn!(error = %e, "Failed to prepare placeholder hash"))
            .ok();

        Self {
            user_repo,
            password_service,
            auth_service,
            dummy_hash,
        }
    }

    /// Exchange a username and password for an access token.
    ///
    /// Unknown user and wrong password produce the same `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let user = self.user_repo.find_by_username(username).await?;

        let password_valid = user
            .as_ref()
            .map(|u| {
                self.password_service
                    .verify_password(password, &u.password_hash)
                    .unwrap_or_else(|e| {
                        warn!(user_id = %u.id, error = %e, "Stored password hash unusable");
                        false
                    })
            })
            .unwrap_or_else(|| {
                if let Some(hash) = &self.dummy_hash {
                    let _ = self.password_service.verify_password(password, hash);
                }
                false
            });

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                warn!(username = %username, "Login failed");
                return Err(PlatformError::InvalidCredentials);
            }
        };

        let token = self.auth_service.generate_access_token(&user.id)?;
        info!(user_id = %user.id, "Login succeeded");
        Ok(token)
    }
}
