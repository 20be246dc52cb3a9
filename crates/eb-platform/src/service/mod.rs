//! Service Layer
//!
//! Business logic for the platform: token issue/verification, password
//! hashing, the bearer-token guard, login, and event CRUD.

pub mod auth;
pub mod events;
pub mod guard;
pub mod login;
pub mod password;

use std::sync::Arc;

use crate::repository::{EventRepository, UserRepository};

pub use auth::{AccessTokenClaims, AuthConfig, AuthService, extract_bearer_token};
pub use events::EventService;
pub use guard::AuthGuard;
pub use login::LoginService;
pub use password::{Argon2Config, PasswordService};

/// The service graph, built once at startup and shared by every handler.
#[derive(Clone)]
pub struct PlatformServices {
    pub auth_service: Arc<AuthService>,
    pub password_service: Arc<PasswordService>,
    pub auth_guard: Arc<AuthGuard>,
    pub login_service: Arc<LoginService>,
    pub event_service: Arc<EventService>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl PlatformServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        auth_config: AuthConfig,
        password_service: PasswordService,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(auth_config));
        let password_service = Arc::new(password_service);

        let auth_guard = Arc::new(AuthGuard::new(auth_service.clone(), user_repo.clone()));
        let login_service = Arc::new(LoginService::new(
            user_repo.clone(),
            password_service.clone(),
            auth_service.clone(),
        ));
        let event_service = Arc::new(EventService::new(event_repo));

        Self {
            auth_service,
            password_service,
            auth_guard,
            login_service,
            event_service,
            user_repo,
        }
    }
}
