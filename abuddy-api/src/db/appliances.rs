//! Appliance queries
//!
//! `owner` scopes a query to one user's appliances; `None` (anonymous
//! caller) sees every appliance.

use abuddy_common::api::{ApplianceCreate, ApplianceUpdate, ApplianceView};
use abuddy_common::db::Appliance;
use abuddy_common::{time, Result, WarrantyPolicy};
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{contacts, documents, maintenance};

/// Appliances ordered by most recently updated first
///
/// `search` matches name, brand or model, case-insensitively.
pub async fn list_appliances(
    pool: &SqlitePool,
    owner: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<Appliance>> {
    let pattern = search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(like_pattern);

    let appliances = sqlx::query_as(
        r#"
        SELECT * FROM appliances
        WHERE (? IS NULL OR user_id = ?)
          AND (? IS NULL
               OR lower(name) LIKE ? ESCAPE '\'
               OR lower(brand) LIKE ? ESCAPE '\'
               OR lower(model) LIKE ? ESCAPE '\')
        ORDER BY updated_at DESC, rowid DESC
        "#,
    )
    .bind(owner)
    .bind(owner)
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(appliances)
}

pub async fn get_appliance(
    pool: &SqlitePool,
    id: &str,
    owner: Option<&str>,
) -> Result<Option<Appliance>> {
    let appliance = sqlx::query_as(
        "SELECT * FROM appliances WHERE id = ? AND (? IS NULL OR user_id = ?)",
    )
    .bind(id)
    .bind(owner)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    Ok(appliance)
}

pub async fn count_for_user(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM appliances WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn insert_appliance(
    conn: &mut SqliteConnection,
    user_id: &str,
    input: &ApplianceCreate,
) -> Result<Appliance> {
    let now = time::now();
    let appliance = Appliance {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: input.name.trim().to_string(),
        brand: input.brand.trim().to_string(),
        model: input.model.trim().to_string(),
        purchase_date: input.purchase_date.date(),
        warranty_duration_months: input.warranty_duration_months,
        serial_number: input.serial_number.clone(),
        purchase_location: input.purchase_location.clone(),
        notes: input.notes.clone(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO appliances (
            id, user_id, name, brand, model, purchase_date, warranty_duration_months,
            serial_number, purchase_location, notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&appliance.id)
    .bind(&appliance.user_id)
    .bind(&appliance.name)
    .bind(&appliance.brand)
    .bind(&appliance.model)
    .bind(appliance.purchase_date)
    .bind(appliance.warranty_duration_months)
    .bind(&appliance.serial_number)
    .bind(&appliance.purchase_location)
    .bind(&appliance.notes)
    .bind(appliance.created_at)
    .bind(appliance.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(appliance)
}

/// Apply a partial update; `None` when the appliance is missing or not owned
pub async fn update_appliance(
    pool: &SqlitePool,
    id: &str,
    owner: Option<&str>,
    changes: &ApplianceUpdate,
) -> Result<Option<Appliance>> {
    let Some(mut appliance) = get_appliance(pool, id, owner).await? else {
        return Ok(None);
    };

    if let Some(name) = &changes.name {
        appliance.name = name.trim().to_string();
    }
    if let Some(brand) = &changes.brand {
        appliance.brand = brand.trim().to_string();
    }
    if let Some(model) = &changes.model {
        appliance.model = model.trim().to_string();
    }
    if let Some(date) = changes.purchase_date {
        appliance.purchase_date = date.date();
    }
    if let Some(months) = changes.warranty_duration_months {
        appliance.warranty_duration_months = months;
    }
    if let Some(serial) = &changes.serial_number {
        appliance.serial_number = serial.clone();
    }
    if let Some(location) = &changes.purchase_location {
        appliance.purchase_location = location.clone();
    }
    if let Some(notes) = &changes.notes {
        appliance.notes = notes.clone();
    }
    appliance.updated_at = time::now();

    sqlx::query(
        r#"
        UPDATE appliances
        SET name = ?, brand = ?, model = ?, purchase_date = ?, warranty_duration_months = ?,
            serial_number = ?, purchase_location = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&appliance.name)
    .bind(&appliance.brand)
    .bind(&appliance.model)
    .bind(appliance.purchase_date)
    .bind(appliance.warranty_duration_months)
    .bind(&appliance.serial_number)
    .bind(&appliance.purchase_location)
    .bind(&appliance.notes)
    .bind(appliance.updated_at)
    .bind(&appliance.id)
    .execute(pool)
    .await?;

    Ok(Some(appliance))
}

/// Delete an appliance and, through the foreign keys, all of its children
pub async fn delete_appliance(pool: &SqlitePool, id: &str, owner: Option<&str>) -> Result<bool> {
    let result = sqlx::query("DELETE FROM appliances WHERE id = ? AND (? IS NULL OR user_id = ?)")
        .bind(id)
        .bind(owner)
        .bind(owner)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM appliances WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Load an appliance's children and derive its warranty fields
pub async fn load_view(
    pool: &SqlitePool,
    appliance: Appliance,
    policy: &WarrantyPolicy,
    today: NaiveDate,
) -> Result<ApplianceView> {
    let contacts = contacts::list_contacts(pool, &appliance.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let tasks = maintenance::list_tasks(pool, &appliance.id)
        .await?
        .into_iter()
        .map(|task| task.into_view(today))
        .collect();
    let documents = documents::list_documents(pool, &appliance.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(appliance.into_view(policy, today, contacts, tasks, documents))
}

pub async fn load_views(
    pool: &SqlitePool,
    appliances: Vec<Appliance>,
    policy: &WarrantyPolicy,
    today: NaiveDate,
) -> Result<Vec<ApplianceView>> {
    let mut views = Vec::with_capacity(appliances.len());
    for appliance in appliances {
        views.push(load_view(pool, appliance, policy, today).await?);
    }
    Ok(views)
}

/// Lowercased `%term%` with LIKE wildcards escaped
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Samsung"), "%samsung%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
