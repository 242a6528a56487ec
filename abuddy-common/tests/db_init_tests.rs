//! Unit tests for database initialization and migrations

use abuddy_common::db::{get_schema_version, init_database, init_memory_database, CURRENT_SCHEMA_VERSION};
use sqlx::SqlitePool;

async fn table_names(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("abuddy.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_all_tables_created() {
    let pool = init_memory_database().await.unwrap();

    let tables = table_names(&pool).await;
    for expected in [
        "appliances",
        "linked_documents",
        "maintenance_tasks",
        "schema_version",
        "support_contacts",
        "users",
    ] {
        assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
    }
}

#[tokio::test]
async fn test_schema_version_current() {
    let pool = init_memory_database().await.unwrap();
    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn test_idempotent_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("abuddy.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query(
        "INSERT INTO users (id, email, created_at, updated_at) VALUES ('u1', 'u1@example.com', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    // Reopening keeps data and does not re-run migrations
    let pool = init_database(&db_path).await.unwrap();
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(versions, CURRENT_SCHEMA_VERSION as i64);
}

#[tokio::test]
async fn test_foreign_keys_enabled() {
    let pool = init_memory_database().await.unwrap();

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enabled, 1);

    let orphan = sqlx::query(
        r#"
        INSERT INTO appliances (id, user_id, name, brand, model, purchase_date,
            warranty_duration_months, created_at, updated_at)
        VALUES ('a1', 'nobody', 'Fridge', 'Samsung', 'X', '2024-01-01', 12,
            '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')
        "#,
    )
    .execute(&pool)
    .await;
    assert!(orphan.is_err(), "Insert referencing a missing user should fail");
}

#[tokio::test]
async fn test_warranty_months_check_constraint() {
    let pool = init_memory_database().await.unwrap();
    sqlx::query(
        "INSERT INTO users (id, email, created_at, updated_at) VALUES ('u1', 'u1@example.com', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = sqlx::query(
        r#"
        INSERT INTO appliances (id, user_id, name, brand, model, purchase_date,
            warranty_duration_months, created_at, updated_at)
        VALUES ('a1', 'u1', 'Fridge', 'Samsung', 'X', '2024-01-01', 0,
            '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')
        "#,
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "Zero-month warranty should violate the CHECK constraint");
}

#[tokio::test]
async fn test_legacy_status_column_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("legacy.db");

    // A database from before status was derived: stored status, no version rows
    {
        let pool = SqlitePool::connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
            .await
            .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE maintenance_tasks (
                id TEXT PRIMARY KEY,
                appliance_id TEXT NOT NULL,
                task_name TEXT NOT NULL,
                scheduled_date DATE NOT NULL,
                frequency TEXT NOT NULL,
                service_provider TEXT,
                notes TEXT,
                status TEXT NOT NULL DEFAULT 'Upcoming',
                completed_date DATE,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();

    let status_columns: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('maintenance_tasks') WHERE name = 'status'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status_columns, 0);
    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
}
