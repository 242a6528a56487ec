//! Demo appliances for a fresh account
//!
//! Dates are relative to `today` so the set always shows every warranty
//! status: two long-running active warranties, one with about a month left,
//! one expiring soon and one expired.

use abuddy_common::api::{
    ApplianceCreate, Frequency, LinkedDocumentCreate, MaintenanceTaskCreate, ServiceProvider,
    SupportContactCreate,
};
use abuddy_common::{CalendarDate, Result};
use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;
use tracing::info;

use super::{appliances, contacts, documents, maintenance, users};
use crate::identity::Identity;

struct SampleAppliance {
    name: &'static str,
    brand: &'static str,
    model: &'static str,
    days_ago: i64,
    warranty_months: i64,
    serial_number: &'static str,
    purchase_location: &'static str,
    notes: &'static str,
    contact: SampleContact,
    tasks: &'static [SampleTask],
    document: (&'static str, &'static str),
}

struct SampleContact {
    name: &'static str,
    company: &'static str,
    phone: &'static str,
    email: &'static str,
    website: &'static str,
    notes: &'static str,
}

struct SampleTask {
    name: &'static str,
    /// Negative: already past
    days_from_today: i64,
    frequency: Frequency,
    provider: &'static str,
    notes: &'static str,
    completed: bool,
}

const SAMPLES: [SampleAppliance; 5] = [
    SampleAppliance {
        name: "Samsung French Door Refrigerator",
        brand: "Samsung",
        model: "RF28R7351SG",
        days_ago: 365,
        warranty_months: 24,
        serial_number: "SN123456789",
        purchase_location: "Best Buy",
        notes: "Energy Star certified, 28 cu ft capacity",
        contact: SampleContact {
            name: "Samsung Customer Service",
            company: "Samsung Electronics",
            phone: "1-800-726-7864",
            email: "support@samsung.com",
            website: "https://www.samsung.com/us/support/",
            notes: "Available 24/7 for technical support",
        },
        tasks: &[
            SampleTask {
                name: "Replace water filter",
                days_from_today: 30,
                frequency: Frequency::Custom,
                provider: "Self-service",
                notes: "Every 6 months; order filter model DA29-00020B",
                completed: false,
            },
            SampleTask {
                name: "Clean condenser coils",
                days_from_today: -60,
                frequency: Frequency::Yearly,
                provider: "Self-service",
                notes: "Vacuum coils behind the kick plate",
                completed: true,
            },
        ],
        document: (
            "Samsung Refrigerator User Manual",
            "https://example.com/samsung-rf28r7351sg-manual.pdf",
        ),
    },
    SampleAppliance {
        name: "Whirlpool Front Load Washer",
        brand: "Whirlpool",
        model: "WFW9620HC",
        days_ago: 330,
        warranty_months: 12,
        serial_number: "WH987654321",
        purchase_location: "Home Depot",
        notes: "High efficiency, 5.0 cu ft capacity",
        contact: SampleContact {
            name: "Whirlpool Support",
            company: "Whirlpool Corporation",
            phone: "1-866-698-2538",
            email: "contact@whirlpool.com",
            website: "https://www.whirlpool.com/services/",
            notes: "Best time to call: weekdays 8 AM - 8 PM EST",
        },
        tasks: &[SampleTask {
            name: "Clean washer drum and gasket",
            days_from_today: 7,
            frequency: Frequency::Monthly,
            provider: "Self-service",
            notes: "Run cleaning cycle to prevent mold and odors",
            completed: false,
        }],
        document: (
            "Whirlpool Washer Installation Guide",
            "https://example.com/whirlpool-wfw9620hc-install.pdf",
        ),
    },
    SampleAppliance {
        name: "GE Gas Range",
        brand: "GE",
        model: "JGB735SPSS",
        days_ago: 450,
        warranty_months: 12,
        serial_number: "GE555444333",
        purchase_location: "Lowes",
        notes: "5-burner gas range with convection oven",
        contact: SampleContact {
            name: "GE Appliances Support",
            company: "GE Appliances",
            phone: "1-800-432-2737",
            email: "info@geappliances.com",
            website: "https://www.geappliances.com/support/",
            notes: "Live chat available on website",
        },
        tasks: &[
            SampleTask {
                name: "Annual gas safety inspection",
                days_from_today: -10,
                frequency: Frequency::Yearly,
                provider: "Metro Gas Services",
                notes: "Required annual inspection for gas appliances",
                completed: false,
            },
            SampleTask {
                name: "Degrease burner grates",
                days_from_today: 45,
                frequency: Frequency::Monthly,
                provider: "Self-service",
                notes: "Soak grates overnight in warm soapy water",
                completed: false,
            },
        ],
        document: (
            "GE Range Owner Manual",
            "https://example.com/ge-jgb735spss-manual.pdf",
        ),
    },
    SampleAppliance {
        name: "LG Dishwasher",
        brand: "LG",
        model: "LDT5678SS",
        days_ago: 60,
        warranty_months: 24,
        serial_number: "LG111222333",
        purchase_location: "Best Buy",
        notes: "QuadWash technology, stainless steel interior",
        contact: SampleContact {
            name: "LG Customer Support",
            company: "LG Electronics",
            phone: "1-800-243-0000",
            email: "support@lge.com",
            website: "https://www.lg.com/us/support",
            notes: "Online troubleshooting tools available",
        },
        tasks: &[SampleTask {
            name: "Clean dishwasher filter",
            days_from_today: 14,
            frequency: Frequency::Monthly,
            provider: "Self-service",
            notes: "Remove and rinse filter under hot water",
            completed: false,
        }],
        document: (
            "LG Dishwasher User Guide",
            "https://example.com/lg-ldt5678ss-manual.pdf",
        ),
    },
    SampleAppliance {
        name: "Dyson V15 Vacuum Cleaner",
        brand: "Dyson",
        model: "V15 Detect",
        days_ago: 340,
        warranty_months: 12,
        serial_number: "DY789456123",
        purchase_location: "Amazon",
        notes: "Laser dust detection, powerful suction",
        contact: SampleContact {
            name: "Dyson Customer Care",
            company: "Dyson Inc.",
            phone: "1-866-693-9766",
            email: "help@dyson.com",
            website: "https://www.dyson.com/support",
            notes: "Expert advice and parts available",
        },
        tasks: &[SampleTask {
            name: "Replace vacuum filter",
            days_from_today: 21,
            frequency: Frequency::Custom,
            provider: "Self-service",
            notes: "Every 3 months; washable HEPA filter included",
            completed: false,
        }],
        document: (
            "Dyson V15 User Manual",
            "https://example.com/dyson-v15-manual.pdf",
        ),
    },
];

/// Number of appliances a reset creates
pub const SAMPLE_APPLIANCE_COUNT: usize = SAMPLES.len();

/// Replace all of a user's appliances with the sample set
///
/// Runs in one transaction; the user row is created first if missing.
pub async fn replace_with_sample_data(
    pool: &SqlitePool,
    identity: &Identity,
    today: NaiveDate,
) -> Result<usize> {
    let mut tx = pool.begin().await?;

    // Write first so the transaction holds the write lock from the start
    let removed = appliances::delete_for_user(&mut tx, &identity.id).await?;
    users::ensure_user(&mut tx, identity).await?;

    for sample in &SAMPLES {
        let appliance = appliances::insert_appliance(
            &mut tx,
            &identity.id,
            &ApplianceCreate {
                name: sample.name.to_string(),
                brand: sample.brand.to_string(),
                model: sample.model.to_string(),
                purchase_date: days_from(today, -sample.days_ago),
                warranty_duration_months: sample.warranty_months,
                serial_number: Some(sample.serial_number.to_string()),
                purchase_location: Some(sample.purchase_location.to_string()),
                notes: Some(sample.notes.to_string()),
            },
        )
        .await?;

        let contact = &sample.contact;
        contacts::insert_contact(
            &mut tx,
            &appliance.id,
            &SupportContactCreate {
                name: contact.name.to_string(),
                company: Some(contact.company.to_string()),
                phone: Some(contact.phone.to_string()),
                email: Some(contact.email.to_string()),
                website: Some(contact.website.to_string()),
                notes: Some(contact.notes.to_string()),
            },
        )
        .await?;

        for task in sample.tasks {
            let scheduled = days_from(today, task.days_from_today);
            maintenance::insert_task(
                &mut tx,
                &appliance.id,
                &MaintenanceTaskCreate {
                    task_name: task.name.to_string(),
                    scheduled_date: scheduled,
                    frequency: task.frequency,
                    service_provider: Some(ServiceProvider {
                        name: task.provider.to_string(),
                        phone: None,
                        email: None,
                        notes: None,
                    }),
                    notes: Some(task.notes.to_string()),
                    completed_date: task.completed.then_some(scheduled),
                },
            )
            .await?;
        }

        let (title, url) = sample.document;
        documents::insert_document(
            &mut tx,
            &appliance.id,
            &LinkedDocumentCreate {
                title: title.to_string(),
                url: url.to_string(),
            },
        )
        .await?;
    }

    tx.commit().await?;

    info!(
        "Loaded {} sample appliances for user {} (replaced {})",
        SAMPLES.len(),
        identity.id,
        removed
    );
    Ok(SAMPLES.len())
}

fn days_from(today: NaiveDate, days: i64) -> CalendarDate {
    CalendarDate(today + Duration::days(days))
}
