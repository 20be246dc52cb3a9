//! OpenAPI Documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Booking API OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Booking API",
        version = "1.0.0",
        description = "Token login and creator-owned event management"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Authentication"),
        (name = "events", description = "Event management"),
        (name = "monitoring", description = "Health")
    ),
    paths(
        super::auth::login,
        super::events::create_event,
        super::events::list_events,
        super::events::get_event,
        super::events::update_event,
        super::events::delete_event,
        super::common::health,
    ),
    components(
        schemas(
            super::auth::LoginForm,
            super::auth::TokenResponse,
            super::events::CreateEventRequest,
            super::events::UpdateEventRequest,
            super::events::EventResponse,
            super::common::ApiError,
            super::common::MessageResponse,
            super::common::HealthResponse,
        )
    ),
    modifiers(&BearerSecurity)
)]
pub struct BookingApiDoc;

/// Registers the `bearer_auth` scheme referenced by the event paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_booking_paths() {
        let doc = BookingApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in ["/token", "/events/", "/events/{id}", "/health"] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {}", expected);
        }
        assert!(doc
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false));
    }
}
