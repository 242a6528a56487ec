//! Shared API request/response types
//!
//! All JSON keys are camelCase. Every endpoint except `/health` wraps its
//! payload in [`ApiResponse`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{FieldError, Validate, ValidationErrors};
use crate::status::{MaintenanceStatus, WarrantyStatus};
use crate::time::CalendarDate;

// ========================================
// Envelope
// ========================================

/// Response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            pagination: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: None,
            pagination: None,
        }
    }

    pub fn error(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors,
            pagination: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn flatten_ref(value: &Option<Option<String>>) -> Option<&str> {
    value.as_ref().and_then(|v| v.as_deref())
}

// ========================================
// Appliances
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceCreate {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub purchase_date: CalendarDate,
    pub warranty_duration_months: i64,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub purchase_location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for ApplianceCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("name", "Name", &self.name, 255);
        errors.required("brand", "Brand", &self.brand, 255);
        errors.required("model", "Model", &self.model, 255);
        errors.warranty_months(self.warranty_duration_months);
        errors.max_len("serialNumber", self.serial_number.as_deref(), 255);
        errors.max_len("purchaseLocation", self.purchase_location.as_deref(), 255);
        errors.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<CalendarDate>,
    #[serde(default)]
    pub warranty_duration_months: Option<i64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub purchase_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Validate for ApplianceUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.required("name", "Name", name, 255);
        }
        if let Some(brand) = &self.brand {
            errors.required("brand", "Brand", brand, 255);
        }
        if let Some(model) = &self.model {
            errors.required("model", "Model", model, 255);
        }
        if let Some(months) = self.warranty_duration_months {
            errors.warranty_months(months);
        }
        errors.max_len("serialNumber", flatten_ref(&self.serial_number), 255);
        errors.max_len("purchaseLocation", flatten_ref(&self.purchase_location), 255);
        errors.finish()
    }
}

/// Appliance as returned by the API, with derived warranty fields and
/// its children
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceView {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub purchase_date: CalendarDate,
    pub warranty_duration_months: i64,
    pub warranty_end_date: CalendarDate,
    pub warranty_status: WarrantyStatus,
    pub serial_number: Option<String>,
    pub purchase_location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub support_contacts: Vec<SupportContactView>,
    pub maintenance_tasks: Vec<MaintenanceTaskView>,
    pub linked_documents: Vec<LinkedDocumentView>,
}

/// Dashboard counts over the caller's appliances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceSummary {
    pub total: i64,
    pub active: i64,
    pub expiring_soon: i64,
    pub expired: i64,
    pub upcoming_tasks: i64,
    pub overdue_tasks: i64,
    pub completed_tasks: i64,
}

impl ApplianceSummary {
    pub fn from_appliances(appliances: &[ApplianceView]) -> Self {
        let mut summary = Self::default();
        for appliance in appliances {
            summary.total += 1;
            match appliance.warranty_status {
                WarrantyStatus::Active => summary.active += 1,
                WarrantyStatus::ExpiringSoon => summary.expiring_soon += 1,
                WarrantyStatus::Expired => summary.expired += 1,
            }
            for task in &appliance.maintenance_tasks {
                match task.status {
                    MaintenanceStatus::Upcoming => summary.upcoming_tasks += 1,
                    MaintenanceStatus::Overdue => summary.overdue_tasks += 1,
                    MaintenanceStatus::Completed => summary.completed_tasks += 1,
                }
            }
        }
        summary
    }
}

// ========================================
// Support contacts
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportContactCreate {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for SupportContactCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("name", "Name", &self.name, 255);
        errors.max_len("company", self.company.as_deref(), 255);
        errors.max_len("phone", self.phone.as_deref(), 50);
        errors.email("email", self.email.as_deref(), 255);
        errors.url("website", self.website.as_deref(), 500);
        errors.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportContactUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Validate for SupportContactUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.required("name", "Name", name, 255);
        }
        errors.max_len("company", flatten_ref(&self.company), 255);
        errors.max_len("phone", flatten_ref(&self.phone), 50);
        errors.email("email", flatten_ref(&self.email), 255);
        errors.url("website", flatten_ref(&self.website), 500);
        errors.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportContactView {
    pub id: String,
    pub appliance_id: String,
    pub name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ========================================
// Maintenance tasks
// ========================================

/// How often a maintenance task recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "One-time")]
    OneTime,
    Monthly,
    Yearly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::OneTime => "One-time",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
            Frequency::Custom => "Custom",
        }
    }
}

/// Who performs a maintenance task; stored as a JSON document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ServiceProvider {
    fn check(&self, errors: &mut ValidationErrors) {
        errors.email("serviceProvider.email", self.email.as_deref(), 255);
    }
}

/// New maintenance task
///
/// A `status` field sent by older clients is ignored; status is always
/// derived from the dates on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTaskCreate {
    pub task_name: String,
    pub scheduled_date: CalendarDate,
    pub frequency: Frequency,
    #[serde(default)]
    pub service_provider: Option<ServiceProvider>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed_date: Option<CalendarDate>,
}

impl Validate for MaintenanceTaskCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("taskName", "Task name", &self.task_name, 255);
        if let Some(provider) = &self.service_provider {
            provider.check(&mut errors);
        }
        errors.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTaskUpdate {
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<CalendarDate>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<Option<ServiceProvider>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    /// `null` reopens a completed task
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<Option<CalendarDate>>,
}

impl Validate for MaintenanceTaskUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.task_name {
            errors.required("taskName", "Task name", name, 255);
        }
        if let Some(Some(provider)) = &self.service_provider {
            provider.check(&mut errors);
        }
        errors.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTaskView {
    pub id: String,
    pub appliance_id: String,
    pub task_name: String,
    pub scheduled_date: CalendarDate,
    pub frequency: String,
    pub service_provider: Option<ServiceProvider>,
    pub notes: Option<String>,
    pub status: MaintenanceStatus,
    pub completed_date: Option<CalendarDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ========================================
// Linked documents
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDocumentCreate {
    pub title: String,
    pub url: String,
}

impl Validate for LinkedDocumentCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("title", "Title", &self.title, 255);
        errors.url("url", Some(&self.url), 1000);
        errors.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDocumentUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Validate for LinkedDocumentUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            errors.required("title", "Title", title, 255);
        }
        errors.url("url", self.url.as_deref(), 1000);
        errors.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDocumentView {
    pub id: String,
    pub appliance_id: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ========================================
// Users
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
