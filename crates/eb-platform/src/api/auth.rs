//! Auth API Endpoints
//!
//! - POST /token - Password login (form encoded), returns a bearer token

use std::sync::Arc;

use axum::{extract::State, routing::post, Form, Json, Router};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PlatformError;
use crate::service::LoginService;

/// Login form
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Auth service state
#[derive(Clone)]
pub struct AuthState {
    pub login_service: Arc<LoginService>,
}

/// Login with username and password
///
/// Unknown users and wrong passwords get the same 401.
#[utoipa::path(
    post,
    path = "/token",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::common::ApiError),
        (status = 422, description = "Missing form fields", body = crate::api::common::ApiError)
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    WithRejection(Form(form), _): WithRejection<Form<LoginForm>, PlatformError>,
) -> Result<Json<TokenResponse>, PlatformError> {
    let token = state.login_service.login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// Create auth router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/token", post(login))
        .with_state(state)
}
