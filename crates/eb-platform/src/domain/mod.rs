//! Domain Models
//!
//! Typed records for the booking platform. Storage-specific shapes live in
//! the repository layer; these types never carry BSON.
//! All entities use string IDs (24-char hex, the store's native id format).

pub mod event;
pub mod user;

pub use event::*;
pub use user::*;

/// Generate a fresh entity id.
pub fn new_id() -> String {
    bson::oid::ObjectId::new().to_hex()
}
