//! Auth Guard
//!
//! Resolves a bearer token to a stored user.

use std::sync::Arc;

use tracing::debug;

use crate::domain::User;
use crate::error::{PlatformError, Result};
use crate::repository::UserRepository;
use crate::service::auth::{extract_bearer_token, AuthService};

pub struct AuthGuard {
    auth_service: Arc<AuthService>,
    user_repo: Arc<dyn UserRepository>,
}

impl AuthGuard {
    pub fn new(auth_service: Arc<AuthService>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            auth_service,
            user_repo,
        }
    }

    /// Verify `token` and load its user. A valid token for a user that no
    /// longer exists fails with `UserNotFound`.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = self.auth_service.verify(token)?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| PlatformError::UserNotFound { id: user_id.clone() })?;

        debug!(user_id = %user.id, "Request authenticated");
        Ok(user)
    }

    /// Authenticate from a raw `Authorization` header value.
    pub async fn authenticate_header(&self, header: Option<&str>) -> Result<User> {
        let header = header.ok_or_else(|| PlatformError::invalid_token("Missing Authorization header"))?;
        let token = extract_bearer_token(header)
            .ok_or_else(|| PlatformError::invalid_token("Invalid Authorization header format"))?;
        self.authenticate(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use crate::service::auth::AuthConfig;
    use chrono::{Duration, Utc};

    async fn setup() -> (AuthGuard, Arc<AuthService>, Arc<InMemoryUserRepository>, User) {
        let auth = Arc::new(AuthService::new(AuthConfig::new("guard-secret")));
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = User::new("alice", "alice@example.com", "hash");
        repo.insert(&user).await.unwrap();
        let guard = AuthGuard::new(auth.clone(), repo.clone());
        (guard, auth, repo, user)
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let (guard, auth, _, user) = setup().await;
        let token = auth.generate_access_token(&user.id).unwrap();
        assert_eq!(guard.authenticate(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid() {
        let (guard, auth, _, user) = setup().await;
        let token = auth
            .generate_access_token_at(&user.id, Utc::now() - Duration::hours(1))
            .unwrap();
        assert!(matches!(
            guard.authenticate(&token).await,
            Err(PlatformError::InvalidToken { .. })
        ));
    }

    #[tokio::test]
    async fn test_removed_user_is_not_found() {
        let (guard, auth, repo, user) = setup().await;
        let token = auth.generate_access_token(&user.id).unwrap();
        repo.remove(&user.id);
        assert!(matches!(
            guard.authenticate(&token).await,
            Err(PlatformError::UserNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_header_handling() {
        let (guard, auth, _, user) = setup().await;
        let token = auth.generate_access_token(&user.id).unwrap();

        let header = format!("Bearer {}", token);
        assert!(guard.authenticate_header(Some(&header)).await.is_ok());
        assert!(matches!(
            guard.authenticate_header(None).await,
            Err(PlatformError::InvalidToken { .. })
        ));
        assert!(matches!(
            guard.authenticate_header(Some(token.as_str())).await,
            Err(PlatformError::InvalidToken { .. })
        ));
    }
}
