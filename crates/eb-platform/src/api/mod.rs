//! API Layer
//!
//! REST endpoints for the booking platform.

pub mod auth;
pub mod common;
pub mod events;
pub mod middleware;
pub mod openapi;

use axum::{routing::get, Router};

use crate::service::PlatformServices;

pub use auth::{auth_router, AuthState, LoginForm, TokenResponse};
pub use common::{health, ApiError, HealthResponse, MessageResponse};
pub use events::{events_router, EventResponse, EventsState};
pub use middleware::{auth_middleware, Authenticated};
pub use openapi::BookingApiDoc;

/// All booking routes: `/token`, `/events*`, and `/health`.
pub fn router(services: &PlatformServices) -> Router {
    let auth_state = AuthState {
        login_service: services.login_service.clone(),
    };
    let events_state = EventsState {
        event_service: services.event_service.clone(),
    };

    Router::new()
        .merge(auth_router(auth_state))
        .merge(events_router(events_state, services.auth_guard.clone()))
        .route("/health", get(health))
}
