//! Events API
//!
//! REST endpoints for event management. Every route sits behind
//! [`auth_middleware`]; reads are open to any user, writes to the creator.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    middleware,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::api::common::{ApiError, MessageResponse};
use crate::api::middleware::{auth_middleware, Authenticated};
use crate::domain::{to_store_precision, Event, EventPatch, NewEvent};
use crate::error::PlatformError;
use crate::service::{AuthGuard, EventService};

/// Create event request. Any client-supplied `creator_id` is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,

    /// RFC 3339 timestamp
    pub date: DateTime<Utc>,

    pub location: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            name: req.name,
            date: req.date,
            location: req.location,
            description: req.description,
        }
    }
}

/// Partial update. Omitted fields are untouched; `"description": null`
/// clears the description.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

/// Distinguishes a present `null` (`Some(None)`) from an absent field (`None`).
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            name: req.name,
            date: req.date.map(to_store_precision),
            location: req.location,
            description: req.description,
        }
    }
}

/// Event response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: Option<String>,
    pub creator_id: String,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            name: e.name,
            date: e.date,
            location: e.location,
            description: e.description,
            creator_id: e.creator_id,
        }
    }
}

/// Events service state
#[derive(Clone)]
pub struct EventsState {
    pub event_service: Arc<EventService>,
}

/// Create an event owned by the caller
#[utoipa::path(
    post,
    path = "/events/",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event created", body = EventResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 422, description = "Malformed body", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    State(state): State<EventsState>,
    Authenticated(user): Authenticated,
    WithRejection(Json(req), _): WithRejection<Json<CreateEventRequest>, PlatformError>,
) -> Result<Json<EventResponse>, PlatformError> {
    let event = state.event_service.create(req.into(), &user).await?;
    Ok(Json(event.into()))
}

/// List all events
#[utoipa::path(
    get,
    path = "/events/",
    tag = "events",
    responses(
        (status = 200, description = "All events", body = Vec<EventResponse>),
        (status = 401, description = "Missing or invalid token", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_events(
    State(state): State<EventsState>,
    Authenticated(user): Authenticated,
) -> Result<Json<Vec<EventResponse>>, PlatformError> {
    let events = state.event_service.list(&user).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_event(
    State(state): State<EventsState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, PlatformError> {
    let event = state.event_service.get(&id, &user).await?;
    Ok(Json(event.into()))
}

/// Update an event (creator only)
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = String, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Merged event", body = EventResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Caller is not the creator", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    State(state): State<EventsState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateEventRequest>, PlatformError>,
) -> Result<Json<EventResponse>, PlatformError> {
    let event = state.event_service.update(&id, req.into(), &user).await?;
    Ok(Json(event.into()))
}

/// Delete an event (creator only)
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Caller is not the creator", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    State(state): State<EventsState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, PlatformError> {
    state.event_service.delete(&id, &user).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Create events router, guarded by bearer authentication
pub fn events_router(state: EventsState, guard: Arc<AuthGuard>) -> Router {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route_layer(middleware::from_fn_with_state(guard, auth_middleware))
        .with_state(state)
}
