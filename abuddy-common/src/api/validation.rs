//! Request payload validation
//!
//! Field rules mirror the column limits of the persisted schema. Validation
//! collects every failing field instead of stopping at the first.

use serde::{Deserialize, Serialize};
use url::Url;

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulated validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(())` when nothing was recorded
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Non-empty string with at most `max` characters
    pub fn required(&mut self, field: &str, label: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", label));
        } else if value.chars().count() > max {
            self.add(field, format!("{} must be at most {} characters", label, max));
        }
    }

    /// Optional string with at most `max` characters
    pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.add(field, format!("Must be at most {} characters", max));
            }
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if !is_valid_email(value) {
                self.add(field, "Invalid email address");
            } else {
                self.max_len(field, Some(value), max);
            }
        }
    }

    pub fn url(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if !is_valid_url(value) {
                self.add(field, "Invalid URL");
            } else {
                self.max_len(field, Some(value), max);
            }
        }
    }

    pub fn warranty_months(&mut self, value: i64) {
        if value < 1 {
            self.add(
                "warrantyDurationMonths",
                "Warranty duration must be at least 1 month",
            );
        } else if value > MAX_WARRANTY_MONTHS {
            self.add(
                "warrantyDurationMonths",
                format!("Warranty duration must be at most {} months", MAX_WARRANTY_MONTHS),
            );
        }
    }
}

/// Upper bound keeps the end date well inside the representable range
pub const MAX_WARRANTY_MONTHS: i64 = 1200;

/// Payloads that can check themselves before reaching the store
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Absolute http(s) URL with a host
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
