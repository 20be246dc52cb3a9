//! API Middleware
//!
//! Bearer-token authentication for protected routers.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domain::User;
use crate::error::PlatformError;
use crate::service::AuthGuard;

/// Resolve the caller before the handler runs and stash the user in the
/// request extensions. Rejected requests never reach body extraction.
pub async fn auth_middleware(
    State(guard): State<Arc<AuthGuard>>,
    mut request: Request,
    next: Next,
) -> Result<Response, PlatformError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = guard.authenticate_header(header).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extractor for the user resolved by [`auth_middleware`]
pub struct Authenticated(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| PlatformError::internal("Route is missing authentication middleware"))
    }
}
