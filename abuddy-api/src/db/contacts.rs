//! Support contact queries

use abuddy_common::api::{SupportContactCreate, SupportContactUpdate};
use abuddy_common::db::SupportContact;
use abuddy_common::{time, Result};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Contacts of one appliance, newest first
pub async fn list_contacts(pool: &SqlitePool, appliance_id: &str) -> Result<Vec<SupportContact>> {
    let contacts = sqlx::query_as(
        "SELECT * FROM support_contacts WHERE appliance_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(appliance_id)
    .fetch_all(pool)
    .await?;

    Ok(contacts)
}

pub async fn get_contact(
    pool: &SqlitePool,
    appliance_id: &str,
    id: &str,
) -> Result<Option<SupportContact>> {
    let contact = sqlx::query_as("SELECT * FROM support_contacts WHERE id = ? AND appliance_id = ?")
        .bind(id)
        .bind(appliance_id)
        .fetch_optional(pool)
        .await?;

    Ok(contact)
}

pub async fn insert_contact(
    conn: &mut SqliteConnection,
    appliance_id: &str,
    input: &SupportContactCreate,
) -> Result<SupportContact> {
    let now = time::now();
    let contact = SupportContact {
        id: Uuid::new_v4().to_string(),
        appliance_id: appliance_id.to_string(),
        name: input.name.trim().to_string(),
        company: input.company.clone(),
        phone: input.phone.clone(),
        email: input.email.clone(),
        website: input.website.clone(),
        notes: input.notes.clone(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO support_contacts (
            id, appliance_id, name, company, phone, email, website, notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&contact.id)
    .bind(&contact.appliance_id)
    .bind(&contact.name)
    .bind(&contact.company)
    .bind(&contact.phone)
    .bind(&contact.email)
    .bind(&contact.website)
    .bind(&contact.notes)
    .bind(contact.created_at)
    .bind(contact.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(contact)
}

pub async fn update_contact(
    pool: &SqlitePool,
    appliance_id: &str,
    id: &str,
    changes: &SupportContactUpdate,
) -> Result<Option<SupportContact>> {
    let Some(mut contact) = get_contact(pool, appliance_id, id).await? else {
        return Ok(None);
    };

    if let Some(name) = &changes.name {
        contact.name = name.trim().to_string();
    }
    if let Some(company) = &changes.company {
        contact.company = company.clone();
    }
    if let Some(phone) = &changes.phone {
        contact.phone = phone.clone();
    }
    if let Some(email) = &changes.email {
        contact.email = email.clone();
    }
    if let Some(website) = &changes.website {
        contact.website = website.clone();
    }
    if let Some(notes) = &changes.notes {
        contact.notes = notes.clone();
    }
    contact.updated_at = time::now();

    sqlx::query(
        r#"
        UPDATE support_contacts
        SET name = ?, company = ?, phone = ?, email = ?, website = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&contact.name)
    .bind(&contact.company)
    .bind(&contact.phone)
    .bind(&contact.email)
    .bind(&contact.website)
    .bind(&contact.notes)
    .bind(contact.updated_at)
    .bind(&contact.id)
    .execute(pool)
    .await?;

    Ok(Some(contact))
}

pub async fn delete_contact(pool: &SqlitePool, appliance_id: &str, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM support_contacts WHERE id = ? AND appliance_id = ?")
        .bind(id)
        .bind(appliance_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
