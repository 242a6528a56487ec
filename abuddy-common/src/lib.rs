//! # Appliance Buddy Common Library
//!
//! Shared code for the Appliance Buddy service and its clients:
//! - Warranty and maintenance status derivation
//! - Calendar date parsing
//! - API request/response types and validation
//! - Configuration loading
//! - Database bootstrap and row models (`sqlx` feature)
//!
//! With default features disabled only the pure modules (`status`, `time`,
//! `api`) are compiled, so a client build computes exactly the statuses the
//! server reports.

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod status;
pub mod time;

pub use error::{Error, Result};
pub use status::{MaintenanceStatus, WarrantyPolicy, WarrantyStatus};
pub use time::CalendarDate;
