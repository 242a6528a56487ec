//! Warranty and maintenance status derivation
//!
//! Both classifiers are pure functions of their date inputs and an explicit
//! `today`. Statuses are never persisted; every read path recomputes them.
//! The `*_now` variants read the current UTC calendar date.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time;

/// Default width of the "expiring soon" window, in whole days
pub const DEFAULT_EXPIRING_SOON_DAYS: i64 = 30;

/// Derived warranty state of an appliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarrantyStatus {
    Active,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    Expired,
}

impl WarrantyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarrantyStatus::Active => "Active",
            WarrantyStatus::ExpiringSoon => "Expiring Soon",
            WarrantyStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for WarrantyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarrantyStatus {
    type Err = String;

    /// Accepts the wire names as well as the short filter keywords
    /// (`active`, `expiring`, `expired`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(WarrantyStatus::Active),
            "expiring" | "expiring soon" | "expiring_soon" | "expiringsoon" => {
                Ok(WarrantyStatus::ExpiringSoon)
            }
            "expired" => Ok(WarrantyStatus::Expired),
            other => Err(format!("Unknown warranty status: {}", other)),
        }
    }
}

/// Derived state of a maintenance task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceStatus {
    Upcoming,
    Completed,
    Overdue,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Upcoming => "Upcoming",
            MaintenanceStatus::Completed => "Completed",
            MaintenanceStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(MaintenanceStatus::Upcoming),
            "completed" => Ok(MaintenanceStatus::Completed),
            "overdue" => Ok(MaintenanceStatus::Overdue),
            other => Err(format!("Unknown maintenance status: {}", other)),
        }
    }
}

/// Tunables for warranty classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarrantyPolicy {
    /// A warranty ending within this many days (inclusive) is "expiring soon"
    pub expiring_soon_days: i64,
}

impl Default for WarrantyPolicy {
    fn default() -> Self {
        Self {
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
        }
    }
}

impl WarrantyPolicy {
    pub fn new(expiring_soon_days: i64) -> Self {
        Self { expiring_soon_days }
    }

    /// Classify a warranty as of `today`
    pub fn classify(
        &self,
        purchase_date: NaiveDate,
        warranty_duration_months: u32,
        today: NaiveDate,
    ) -> WarrantyStatus {
        let end = warranty_end_date(purchase_date, warranty_duration_months);

        if today > end {
            WarrantyStatus::Expired
        } else if (end - today).num_days() <= self.expiring_soon_days {
            WarrantyStatus::ExpiringSoon
        } else {
            WarrantyStatus::Active
        }
    }
}

/// Add calendar months, clamping to the last valid day of the target month
///
/// Jan 31 + 1 month is Feb 29 in a leap year and Feb 28 otherwise.
/// Saturates at `NaiveDate::MAX` instead of overflowing.
pub fn add_calendar_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Last day covered by a warranty
pub fn warranty_end_date(purchase_date: NaiveDate, warranty_duration_months: u32) -> NaiveDate {
    add_calendar_months(purchase_date, warranty_duration_months)
}

/// Whole days from `today` until the warranty ends (negative once expired)
pub fn days_until_warranty_end(
    purchase_date: NaiveDate,
    warranty_duration_months: u32,
    today: NaiveDate,
) -> i64 {
    (warranty_end_date(purchase_date, warranty_duration_months) - today).num_days()
}

/// Warranty status with the default 30-day window
///
/// Callers must have validated `warranty_duration_months >= 1`.
pub fn warranty_status(
    purchase_date: NaiveDate,
    warranty_duration_months: u32,
    today: NaiveDate,
) -> WarrantyStatus {
    WarrantyPolicy::default().classify(purchase_date, warranty_duration_months, today)
}

pub fn warranty_status_now(purchase_date: NaiveDate, warranty_duration_months: u32) -> WarrantyStatus {
    warranty_status(purchase_date, warranty_duration_months, time::today())
}

/// Maintenance status as of `today`
///
/// A completion date always wins, whatever its value.
pub fn maintenance_status(
    scheduled_date: NaiveDate,
    completed_date: Option<NaiveDate>,
    today: NaiveDate,
) -> MaintenanceStatus {
    if completed_date.is_some() {
        return MaintenanceStatus::Completed;
    }

    if today > scheduled_date {
        MaintenanceStatus::Overdue
    } else {
        MaintenanceStatus::Upcoming
    }
}

pub fn maintenance_status_now(
    scheduled_date: NaiveDate,
    completed_date: Option<NaiveDate>,
) -> MaintenanceStatus {
    maintenance_status(scheduled_date, completed_date, time::today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_clamps_to_leap_february() {
        assert_eq!(add_calendar_months(date(2024, 1, 31), 1), date(2024, 2, 29));
    }

    #[test]
    fn test_add_months_clamps_to_common_february() {
        assert_eq!(add_calendar_months(date(2023, 1, 31), 1), date(2023, 2, 28));
    }

    #[test]
    fn test_add_months_crosses_year() {
        assert_eq!(add_calendar_months(date(2023, 11, 15), 3), date(2024, 2, 15));
        assert_eq!(add_calendar_months(date(2022, 3, 31), 24), date(2024, 3, 31));
    }

    #[test]
    fn test_add_months_saturates() {
        assert_eq!(add_calendar_months(date(2024, 1, 1), u32::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_warranty_boundaries() {
        let purchase = date(2023, 6, 15);
        let end = warranty_end_date(purchase, 12);
        assert_eq!(end, date(2024, 6, 15));

        assert_eq!(warranty_status(purchase, 12, end - Duration::days(31)), WarrantyStatus::Active);
        assert_eq!(warranty_status(purchase, 12, end - Duration::days(30)), WarrantyStatus::ExpiringSoon);
        assert_eq!(warranty_status(purchase, 12, end), WarrantyStatus::ExpiringSoon);
        assert_eq!(warranty_status(purchase, 12, end + Duration::days(1)), WarrantyStatus::Expired);
    }

    #[test]
    fn test_warranty_day_of_purchase_is_active() {
        let purchase = date(2024, 3, 1);
        assert_eq!(warranty_status(purchase, 12, purchase), WarrantyStatus::Active);
    }

    #[test]
    fn test_short_warranty_starts_expiring_soon() {
        // February 2024 is 29 days long, already inside the window
        let purchase = date(2024, 2, 1);
        assert_eq!(warranty_status(purchase, 1, purchase), WarrantyStatus::ExpiringSoon);
    }

    #[test]
    fn test_custom_policy_window() {
        let purchase = date(2023, 6, 15);
        let end = warranty_end_date(purchase, 12);
        let policy = WarrantyPolicy::new(60);

        assert_eq!(policy.classify(purchase, 12, end - Duration::days(60)), WarrantyStatus::ExpiringSoon);
        assert_eq!(policy.classify(purchase, 12, end - Duration::days(61)), WarrantyStatus::Active);

        let strict = WarrantyPolicy::new(0);
        assert_eq!(strict.classify(purchase, 12, end), WarrantyStatus::ExpiringSoon);
        assert_eq!(strict.classify(purchase, 12, end - Duration::days(1)), WarrantyStatus::Active);
    }

    #[test]
    fn test_days_until_warranty_end() {
        let purchase = date(2024, 1, 31);
        assert_eq!(days_until_warranty_end(purchase, 1, date(2024, 2, 19)), 10);
        assert_eq!(days_until_warranty_end(purchase, 1, date(2024, 3, 2)), -2);
    }

    #[test]
    fn test_completed_always_wins() {
        let scheduled = date(2024, 5, 10);
        let today = date(2024, 6, 1);

        assert_eq!(maintenance_status(scheduled, Some(date(2024, 5, 1)), today), MaintenanceStatus::Completed);
        assert_eq!(maintenance_status(scheduled, Some(date(2030, 1, 1)), today), MaintenanceStatus::Completed);
        assert_eq!(maintenance_status(scheduled, Some(scheduled), date(2000, 1, 1)), MaintenanceStatus::Completed);
    }

    #[test]
    fn test_maintenance_overdue_and_upcoming() {
        let today = date(2024, 6, 1);
        assert_eq!(maintenance_status(today - Duration::days(1), None, today), MaintenanceStatus::Overdue);
        assert_eq!(maintenance_status(today + Duration::days(1), None, today), MaintenanceStatus::Upcoming);
        assert_eq!(maintenance_status(today, None, today), MaintenanceStatus::Upcoming);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&WarrantyStatus::ExpiringSoon).unwrap(), "\"Expiring Soon\"");
        assert_eq!(serde_json::to_string(&MaintenanceStatus::Overdue).unwrap(), "\"Overdue\"");
        let parsed: WarrantyStatus = serde_json::from_str("\"Expiring Soon\"").unwrap();
        assert_eq!(parsed, WarrantyStatus::ExpiringSoon);
    }

    #[test]
    fn test_status_from_filter_keywords() {
        assert_eq!("expiring".parse::<WarrantyStatus>(), Ok(WarrantyStatus::ExpiringSoon));
        assert_eq!("Expiring Soon".parse::<WarrantyStatus>(), Ok(WarrantyStatus::ExpiringSoon));
        assert_eq!("ACTIVE".parse::<WarrantyStatus>(), Ok(WarrantyStatus::Active));
        assert!("lapsed".parse::<WarrantyStatus>().is_err());
        assert_eq!("overdue".parse::<MaintenanceStatus>(), Ok(MaintenanceStatus::Overdue));
        assert!("pending".parse::<MaintenanceStatus>().is_err());
    }
}
