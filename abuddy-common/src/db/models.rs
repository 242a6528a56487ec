//! Database models
//!
//! Rows as stored. Derived fields (warranty end date and status, task
//! status) are attached when a row is turned into its API view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::api::{
    ApplianceView, LinkedDocumentView, MaintenanceTaskView, ServiceProvider, SupportContactView,
    UserProfile,
};
use crate::status::{self, MaintenanceStatus, WarrantyPolicy, WarrantyStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appliance {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub purchase_date: NaiveDate,
    pub warranty_duration_months: i64,
    pub serial_number: Option<String>,
    pub purchase_location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appliance {
    /// Stored duration as the classifier's unsigned month count
    pub fn warranty_months(&self) -> u32 {
        u32::try_from(self.warranty_duration_months.max(0)).unwrap_or(u32::MAX)
    }

    pub fn warranty_end_date(&self) -> NaiveDate {
        status::warranty_end_date(self.purchase_date, self.warranty_months())
    }

    pub fn warranty_status(&self, policy: &WarrantyPolicy, today: NaiveDate) -> WarrantyStatus {
        policy.classify(self.purchase_date, self.warranty_months(), today)
    }

    pub fn into_view(
        self,
        policy: &WarrantyPolicy,
        today: NaiveDate,
        support_contacts: Vec<SupportContactView>,
        maintenance_tasks: Vec<MaintenanceTaskView>,
        linked_documents: Vec<LinkedDocumentView>,
    ) -> ApplianceView {
        let warranty_end_date = self.warranty_end_date().into();
        let warranty_status = self.warranty_status(policy, today);

        ApplianceView {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            brand: self.brand,
            model: self.model,
            purchase_date: self.purchase_date.into(),
            warranty_duration_months: self.warranty_duration_months,
            warranty_end_date,
            warranty_status,
            serial_number: self.serial_number,
            purchase_location: self.purchase_location,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            support_contacts,
            maintenance_tasks,
            linked_documents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SupportContact {
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

impl From<SupportContact> for SupportContactView {
    fn from(contact: SupportContact) -> Self {
        SupportContactView {
            id: contact.id,
            appliance_id: contact.appliance_id,
            name: contact.name,
            company: contact.company,
            phone: contact.phone,
            email: contact.email,
            website: contact.website,
            notes: contact.notes,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceTask {
    pub id: String,
    pub appliance_id: String,
    pub task_name: String,
    pub scheduled_date: NaiveDate,
    pub frequency: String,
    pub service_provider: Option<Json<ServiceProvider>>,
    pub notes: Option<String>,
    pub completed_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceTask {
    pub fn status(&self, today: NaiveDate) -> MaintenanceStatus {
        status::maintenance_status(self.scheduled_date, self.completed_date, today)
    }

    pub fn into_view(self, today: NaiveDate) -> MaintenanceTaskView {
        let status = self.status(today);

        MaintenanceTaskView {
            id: self.id,
            appliance_id: self.appliance_id,
            task_name: self.task_name,
            scheduled_date: self.scheduled_date.into(),
            frequency: self.frequency,
            service_provider: self.service_provider.map(|Json(provider)| provider),
            notes: self.notes,
            status,
            completed_date: self.completed_date.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkedDocument {
    pub id: String,
    pub appliance_id: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LinkedDocument> for LinkedDocumentView {
    fn from(document: LinkedDocument) -> Self {
        LinkedDocumentView {
            id: document.id,
            appliance_id: document.appliance_id,
            title: document.title,
            url: document.url,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::WarrantyStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn appliance(purchase_date: NaiveDate, months: i64) -> Appliance {
        let now = Utc::now();
        Appliance {
            id: "a1".into(),
            user_id: "u1".into(),
            name: "Washer".into(),
            brand: "Whirlpool".into(),
            model: "WFW9620HC".into(),
            purchase_date,
            warranty_duration_months: months,
            serial_number: None,
            purchase_location: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_appliance_view_derives_warranty_fields() {
        let view = appliance(date(2024, 1, 31), 1).into_view(
            &WarrantyPolicy::default(),
            date(2024, 2, 10),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(view.warranty_end_date.date(), date(2024, 2, 29));
        assert_eq!(view.warranty_status, WarrantyStatus::ExpiringSoon);
    }

    #[test]
    fn test_negative_stored_months_clamp_to_zero() {
        assert_eq!(appliance(date(2024, 1, 1), -5).warranty_months(), 0);
    }

    #[test]
    fn test_task_view_recomputes_status() {
        let now = Utc::now();
        let task = MaintenanceTask {
            id: "t1".into(),
            appliance_id: "a1".into(),
            task_name: "Clean lint trap".into(),
            scheduled_date: date(2024, 3, 1),
            frequency: "Monthly".into(),
            service_provider: Some(Json(ServiceProvider {
                name: "Self".into(),
                phone: None,
                email: None,
                notes: None,
            })),
            notes: None,
            completed_date: None,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(task.status(date(2024, 3, 1)), MaintenanceStatus::Upcoming);
        let view = task.into_view(date(2024, 3, 2));
        assert_eq!(view.status, MaintenanceStatus::Overdue);
        assert_eq!(view.service_provider.unwrap().name, "Self");
    }
}
