//! Event Booking Chat Proxy
//!
//! A thin HTTP front for an OpenAI-compatible chat-completion API.

pub mod api;
pub mod client;
pub mod error;

pub use api::{chat_router, ChatRequest, ChatResponse, ChatState};
pub use client::{ChatClientConfig, ChatCompletion, OpenAiChatClient};
pub use error::ChatError;
