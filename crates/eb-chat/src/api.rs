//! Chat API Endpoints
//!
//! - GET / - Welcome message
//! - POST /chat - Forward a query to the completion backend

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::ChatCompletion;
use crate::error::ChatError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Clone)]
pub struct ChatState {
    pub completion: Arc<dyn ChatCompletion>,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the chat API!".to_string(),
    })
}

pub async fn chat(
    State(state): State<ChatState>,
    WithRejection(Json(req), _): WithRejection<Json<ChatRequest>, ChatError>,
) -> Result<Json<ChatResponse>, ChatError> {
    let response = state.completion.complete(&req.query).await?;
    info!(query_len = req.query.len(), response_len = response.len(), "Chat query answered");
    Ok(Json(ChatResponse { response }))
}

pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/chat", post(chat))
        .with_state(state)
}
