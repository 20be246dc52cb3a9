//! Chat Error Types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream response had no choices")]
    EmptyResponse,

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "VALIDATION_ERROR",
            _ => "CHAT_ERROR",
        }
    }
}

/// Error body, same shape as the booking API's
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Chat completion failed");
        }

        let body = ChatErrorBody {
            error: self.error_code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ChatError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            message: rejection.body_text(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
