//! API module for shared HTTP API types
//!
//! Contains only framework-free code: payload types, response envelopes and
//! validation. The service wraps these with axum extractors; clients use
//! them to decode responses.

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{FieldError, Validate, ValidationErrors};
