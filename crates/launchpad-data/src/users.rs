//! Queries over the `users` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Executor, FromRow, MySql};

use crate::error::Result;

fn map_query_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> crate::DataError {
    move |source| crate::DataError::QueryFailed { operation, source }
}

/// Raw projection of the `users` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRow {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input payload for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    /// Display name.
    pub name: &'a str,
    /// Unique email address.
    pub email: &'a str,
}

/// Count all users.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn count_users<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await
        .map_err(map_query_err("count users"))
}

/// Load one page of users, oldest first.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn list_users<'e, E>(executor: E, limit: u32, offset: u32) -> Result<Vec<UserRow>>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, created_at FROM users ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(map_query_err("list users"))
}

/// Load a user by primary key.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_user<'e, E>(executor: E, id: u64) -> Result<Option<UserRow>>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_as::<_, UserRow>("SELECT id, name, email, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_query_err("fetch user"))
}

/// Load a user by email address.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_user_by_email<'e, E>(executor: E, email: &str) -> Result<Option<UserRow>>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_as::<_, UserRow>("SELECT id, name, email, created_at FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(map_query_err("fetch user by email"))
}

/// Insert a user and return the generated primary key.
///
/// # Errors
///
/// Returns an error when the insert fails (including unique-email
/// violations).
pub async fn insert_user<'e, E>(executor: E, user: &NewUser<'_>) -> Result<u64>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
        .bind(user.name)
        .bind(user.email)
        .execute(executor)
        .await
        .map_err(map_query_err("insert user"))?;
    Ok(result.last_insert_id())
}

/// Whether the error is a MySQL unique-constraint violation, used to map
/// duplicate emails to a client error rather than a server fault.
#[must_use]
pub fn is_unique_violation(error: &crate::DataError) -> bool {
    match error {
        crate::DataError::QueryFailed { source, .. } => source
            .as_database_error()
            .is_some_and(sqlx::error::DatabaseError::is_unique_violation),
        _ => false,
    }
}
