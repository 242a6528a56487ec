//! Linked document queries

use abuddy_common::api::{LinkedDocumentCreate, LinkedDocumentUpdate};
use abuddy_common::db::LinkedDocument;
use abuddy_common::{time, Result};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

pub async fn list_documents(pool: &SqlitePool, appliance_id: &str) -> Result<Vec<LinkedDocument>> {
    let documents = sqlx::query_as(
        "SELECT * FROM linked_documents WHERE appliance_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(appliance_id)
    .fetch_all(pool)
    .await?;

    Ok(documents)
}

pub async fn get_document(
    pool: &SqlitePool,
    appliance_id: &str,
    id: &str,
) -> Result<Option<LinkedDocument>> {
    let document = sqlx::query_as("SELECT * FROM linked_documents WHERE id = ? AND appliance_id = ?")
        .bind(id)
        .bind(appliance_id)
        .fetch_optional(pool)
        .await?;

    Ok(document)
}

pub async fn insert_document(
    conn: &mut SqliteConnection,
    appliance_id: &str,
    input: &LinkedDocumentCreate,
) -> Result<LinkedDocument> {
    let now = time::now();
    let document = LinkedDocument {
        id: Uuid::new_v4().to_string(),
        appliance_id: appliance_id.to_string(),
        title: input.title.trim().to_string(),
        url: input.url.trim().to_string(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO linked_documents (id, appliance_id, title, url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&document.id)
    .bind(&document.appliance_id)
    .bind(&document.title)
    .bind(&document.url)
    .bind(document.created_at)
    .bind(document.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(document)
}

pub async fn update_document(
    pool: &SqlitePool,
    appliance_id: &str,
    id: &str,
    changes: &LinkedDocumentUpdate,
) -> Result<Option<LinkedDocument>> {
    let Some(mut document) = get_document(pool, appliance_id, id).await? else {
        return Ok(None);
    };

    if let Some(title) = &changes.title {
        document.title = title.trim().to_string();
    }
    if let Some(url) = &changes.url {
        document.url = url.trim().to_string();
    }
    document.updated_at = time::now();

    sqlx::query("UPDATE linked_documents SET title = ?, url = ?, updated_at = ? WHERE id = ?")
        .bind(&document.title)
        .bind(&document.url)
        .bind(document.updated_at)
        .bind(&document.id)
        .execute(pool)
        .await?;

    Ok(Some(document))
}

pub async fn delete_document(pool: &SqlitePool, appliance_id: &str, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM linked_documents WHERE id = ? AND appliance_id = ?")
        .bind(id)
        .bind(appliance_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
