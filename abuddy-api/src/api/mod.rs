//! HTTP API handlers for abuddy-api

pub mod appliances;
pub mod auth;
pub mod contacts;
pub mod documents;
pub mod error;
pub mod extract;
pub mod health;
pub mod maintenance;

pub use auth::optional_auth;
pub use error::{ApiError, ApiResult};
pub use extract::Caller;
pub use health::{health_routes, not_found};
