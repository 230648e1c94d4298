//! Utility functions

pub mod crypto;
pub mod validation;

pub use crypto::{digest_bytes, verify_digest};
pub use validation::{validate_language_tag, validate_task_name};
