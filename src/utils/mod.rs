//! Shared utilities.

mod audit_url;
mod hash;

pub use audit_url::{validate_audit_url, UrlValidationError};
pub use hash::document_id;
