//! Queries over the `posts` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Executor, FromRow, MySql};

use crate::error::Result;

fn map_query_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> crate::DataError {
    move |source| crate::DataError::QueryFailed { operation, source }
}

/// Raw projection of the `posts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostRow {
    /// Primary key.
    pub id: u64,
    /// Optional author reference into `users`.
    pub author_id: Option<u64>,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Whether the post is publicly visible.
    pub published: bool,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input payload for inserting a post.
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    /// Optional author reference into `users`.
    pub author_id: Option<u64>,
    /// Post title.
    pub title: &'a str,
    /// Post body.
    pub content: &'a str,
    /// Whether the post is publicly visible.
    pub published: bool,
}

/// Count all posts.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn count_posts<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(executor)
        .await
        .map_err(map_query_err("count posts"))
}

/// Load one page of posts, newest first.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn list_posts<'e, E>(executor: E, limit: u32, offset: u32) -> Result<Vec<PostRow>>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_as::<_, PostRow>(
        "SELECT id, author_id, title, content, published, created_at \
         FROM posts ORDER BY id DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(map_query_err("list posts"))
}

/// Load a post by primary key.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_post<'e, E>(executor: E, id: u64) -> Result<Option<PostRow>>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_as::<_, PostRow>(
        "SELECT id, author_id, title, content, published, created_at FROM posts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(map_query_err("fetch post"))
}

/// Insert a post and return the generated primary key.
///
/// # Errors
///
/// Returns an error when the insert fails.
pub async fn insert_post<'e, E>(executor: E, post: &NewPost<'_>) -> Result<u64>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        "INSERT INTO posts (author_id, title, content, published) VALUES (?, ?, ?, ?)",
    )
    .bind(post.author_id)
    .bind(post.title)
    .bind(post.content)
    .bind(post.published)
    .execute(executor)
    .await
    .map_err(map_query_err("insert post"))?;
    Ok(result.last_insert_id())
}
