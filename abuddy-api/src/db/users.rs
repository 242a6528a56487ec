//! Mirrored identity-provider users

use abuddy_common::db::User;
use abuddy_common::{time, Error, Result};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::identity::Identity;

/// Stand-in address for identities without a usable email
fn placeholder_email(user_id: &str) -> String {
    format!("{}@users.invalid", user_id)
}

async fn find_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<User>> {
    Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?)
}

/// Insert unless any unique key (id or email) is already taken
async fn insert_user_if_absent(conn: &mut SqliteConnection, user_id: &str, email: &str) -> Result<()> {
    let now = time::now();
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, first_name, last_name, created_at, updated_at)
        VALUES (?, ?, NULL, NULL, ?, ?)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() > 0 {
        info!("Created user record for {}", user_id);
    }
    Ok(())
}

/// Make sure the caller has a row in `users` and return it
///
/// Appliances reference `users(id)`, so this runs before anything is
/// created on a user's behalf. Safe to race: concurrent first requests of
/// one user all end up with the same row.
///
/// The email column is unique. When the provider's email already belongs to
/// a different id (an account deleted and re-created upstream), the new id
/// is mirrored with a placeholder address and the old row is left alone.
pub async fn ensure_user(conn: &mut SqliteConnection, identity: &Identity) -> Result<User> {
    if let Some(user) = find_user(conn, &identity.id).await? {
        return Ok(user);
    }

    let placeholder = placeholder_email(&identity.id);
    let email = identity.email.as_deref().unwrap_or(&placeholder);
    insert_user_if_absent(conn, &identity.id, email).await?;
    if let Some(user) = find_user(conn, &identity.id).await? {
        return Ok(user);
    }

    warn!(
        "Email {} already belongs to another user; mirroring {} with a placeholder address",
        email, identity.id
    );
    insert_user_if_absent(conn, &identity.id, &placeholder).await?;
    find_user(conn, &identity.id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Could not create user record for {}", identity.id)))
}
