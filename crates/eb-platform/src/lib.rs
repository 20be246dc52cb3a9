//! Event Booking Platform
//!
//! Core platform providing:
//! - Password login issuing short-lived bearer tokens
//! - A bearer-token guard resolving requests to stored users
//! - Event CRUD with creator-only mutation
//! - MongoDB and in-memory storage behind repository traits

pub mod domain;
pub mod repository;
pub mod service;
pub mod api;
pub mod error;
pub mod seed;

pub use domain::*;
pub use error::PlatformError;
pub use service::PlatformServices;
