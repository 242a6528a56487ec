//! Maintenance task queries
//!
//! Tasks carry no stored status; callers derive it with
//! [`MaintenanceTask::status`].

use abuddy_common::api::{MaintenanceTaskCreate, MaintenanceTaskUpdate};
use abuddy_common::db::MaintenanceTask;
use abuddy_common::{time, Result};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Tasks of one appliance, latest scheduled date first
pub async fn list_tasks(pool: &SqlitePool, appliance_id: &str) -> Result<Vec<MaintenanceTask>> {
    let tasks = sqlx::query_as(
        "SELECT * FROM maintenance_tasks WHERE appliance_id = ? ORDER BY scheduled_date DESC, rowid DESC",
    )
    .bind(appliance_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

pub async fn get_task(
    pool: &SqlitePool,
    appliance_id: &str,
    id: &str,
) -> Result<Option<MaintenanceTask>> {
    let task = sqlx::query_as("SELECT * FROM maintenance_tasks WHERE id = ? AND appliance_id = ?")
        .bind(id)
        .bind(appliance_id)
        .fetch_optional(pool)
        .await?;

    Ok(task)
}

pub async fn insert_task(
    conn: &mut SqliteConnection,
    appliance_id: &str,
    input: &MaintenanceTaskCreate,
) -> Result<MaintenanceTask> {
    let now = time::now();
    let task = MaintenanceTask {
        id: Uuid::new_v4().to_string(),
        appliance_id: appliance_id.to_string(),
        task_name: input.task_name.trim().to_string(),
        scheduled_date: input.scheduled_date.date(),
        frequency: input.frequency.as_str().to_string(),
        service_provider: input.service_provider.clone().map(Json),
        notes: input.notes.clone(),
        completed_date: input.completed_date.map(|d| d.date()),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO maintenance_tasks (
            id, appliance_id, task_name, scheduled_date, frequency, service_provider,
            notes, completed_date, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&task.id)
    .bind(&task.appliance_id)
    .bind(&task.task_name)
    .bind(task.scheduled_date)
    .bind(&task.frequency)
    .bind(&task.service_provider)
    .bind(&task.notes)
    .bind(task.completed_date)
    .bind(task.created_at)
    .bind(task.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(task)
}

pub async fn update_task(
    pool: &SqlitePool,
    appliance_id: &str,
    id: &str,
    changes: &MaintenanceTaskUpdate,
) -> Result<Option<MaintenanceTask>> {
    let Some(mut task) = get_task(pool, appliance_id, id).await? else {
        return Ok(None);
    };

    if let Some(name) = &changes.task_name {
        task.task_name = name.trim().to_string();
    }
    if let Some(date) = changes.scheduled_date {
        task.scheduled_date = date.date();
    }
    if let Some(frequency) = changes.frequency {
        task.frequency = frequency.as_str().to_string();
    }
    if let Some(provider) = &changes.service_provider {
        task.service_provider = provider.clone().map(Json);
    }
    if let Some(notes) = &changes.notes {
        task.notes = notes.clone();
    }
    if let Some(completed) = changes.completed_date {
        task.completed_date = completed.map(|d| d.date());
    }
    task.updated_at = time::now();

    sqlx::query(
        r#"
        UPDATE maintenance_tasks
        SET task_name = ?, scheduled_date = ?, frequency = ?, service_provider = ?,
            notes = ?, completed_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&task.task_name)
    .bind(task.scheduled_date)
    .bind(&task.frequency)
    .bind(&task.service_provider)
    .bind(&task.notes)
    .bind(task.completed_date)
    .bind(task.updated_at)
    .bind(&task.id)
    .execute(pool)
    .await?;

    Ok(Some(task))
}

pub async fn delete_task(pool: &SqlitePool, appliance_id: &str, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM maintenance_tasks WHERE id = ? AND appliance_id = ?")
        .bind(id)
        .bind(appliance_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
