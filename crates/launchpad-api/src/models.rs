//! Wire DTOs for the Launchpad API.
//!
//! Request payloads carry their own validation rules so the extractors in
//! `http::extract` can reject bad input with field-level detail before a
//! handler runs. Response types pin the fixed envelopes: `{data}` /
//! `{data, pagination}` on success, `{error, message?, errorId?, details?}`
//! on failure.

use chrono::{DateTime, Utc};
use launchpad_data::posts::PostRow;
use launchpad_data::users::UserRow;
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;
const MAX_NAME_LEN: usize = 120;
const MAX_EMAIL_LEN: usize = 254;
const MAX_TITLE_LEN: usize = 200;

/// Request payloads that can check their own field rules.
pub trait Validate {
    /// Check every rule and report all violations at once.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per violated rule.
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// One violated rule on one request field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    /// Build a field/message pair.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Fixed error envelope returned on every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short machine-readable error label.
    pub error: String,
    /// Human-readable detail; withheld for internal errors in production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Correlation identifier, always present on 500-class responses.
    #[serde(rename = "errorId", skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
    /// Field-level validation detail, present on 400 validation responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Success envelope for single records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataBody<T> {
    /// The record itself.
    pub data: T,
}

/// Success envelope for paginated collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    /// One page of records.
    pub data: Vec<T>,
    /// Page bookkeeping for the collection.
    pub pagination: Pagination,
}

/// Page bookkeeping attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number served.
    pub page: u32,
    /// Page size served.
    pub per_page: u32,
    /// Total records in the collection.
    pub total: u64,
    /// Total pages at this page size.
    pub total_pages: u64,
}

impl Pagination {
    /// Derive the bookkeeping for a page of a `total`-record collection.
    #[must_use]
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page.max(1)))
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Pagination inputs accepted by list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Requested 1-based page number; defaults to 1.
    #[serde(default)]
    pub page: Option<u32>,
    /// Requested page size; defaults to 20, capped at 100.
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Effective page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Effective page size.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Row offset corresponding to the effective page.
    #[must_use]
    pub fn offset(&self) -> u32 {
        (self.page().saturating_sub(1)).saturating_mul(self.per_page())
    }
}

impl Validate for PageQuery {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.page == Some(0) {
            errors.push(FieldError::new("page", "must be at least 1"));
        }
        if let Some(per_page) = self.per_page {
            if per_page == 0 || per_page > MAX_PER_PAGE {
                errors.push(FieldError::new(
                    "per_page",
                    format!("must be between 1 and {MAX_PER_PAGE}"),
                ));
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        } else if name.len() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                format!("must be at most {MAX_NAME_LEN} characters"),
            ));
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "must not be empty"));
        } else if email.len() > MAX_EMAIL_LEN {
            errors.push(FieldError::new(
                "email",
                format!("must be at most {MAX_EMAIL_LEN} characters"),
            ));
        } else if !looks_like_email(email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Optional author; must reference an existing user when present.
    #[serde(default)]
    pub author_id: Option<u64>,
    /// Whether the post is publicly visible; defaults to `false`.
    #[serde(default)]
    pub published: Option<bool>,
}

impl Validate for CreatePostRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError::new("title", "must not be empty"));
        } else if title.len() > MAX_TITLE_LEN {
            errors.push(FieldError::new(
                "title",
                format!("must be at most {MAX_TITLE_LEN} characters"),
            ));
        }
        if self.content.trim().is_empty() {
            errors.push(FieldError::new("content", "must not be empty"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn looks_like_email(value: &str) -> bool {
    value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

/// User record as served over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

/// Post record as served over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    /// Primary key.
    pub id: u64,
    /// Optional author reference.
    pub author_id: Option<u64>,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Whether the post is publicly visible.
    pub published: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_total_pages_up() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).total_pages, 2);
    }

    #[test]
    fn page_query_defaults_and_offsets() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);
        assert_eq!(query.offset(), 0);

        let query = PageQuery {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(query.offset(), 20);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn page_query_rejects_zero_and_oversized_values() {
        let query = PageQuery {
            page: Some(0),
            per_page: Some(101),
        };
        let errors = query.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "page");
        assert_eq!(errors[1].field, "per_page");
    }

    #[test]
    fn create_user_rules_report_every_violation() {
        let request = CreateUserRequest {
            name: "  ".to_string(),
            email: "not-an-email".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].field, "email");
        assert_eq!(errors[1].message, "must be a valid email address");
    }

    #[test]
    fn create_user_accepts_reasonable_input() {
        let request = CreateUserRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_post_requires_title_and_content() {
        let request = CreatePostRequest {
            title: String::new(),
            content: "   ".to_string(),
            author_id: None,
            published: None,
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 2);

        let request = CreatePostRequest {
            title: "a".repeat(201),
            content: "body".to_string(),
            author_id: None,
            published: Some(true),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn error_body_renders_error_id_in_camel_case() {
        let body = ErrorBody {
            error: "internal_server_error".to_string(),
            message: None,
            error_id: Some("abc-123".to_string()),
            details: None,
        };
        let rendered = serde_json::to_value(&body).unwrap();
        assert_eq!(rendered["errorId"], "abc-123");
        assert!(rendered.get("message").is_none());
        assert!(rendered.get("details").is_none());
    }

    #[test]
    fn email_shape_check_needs_local_part_and_dotted_domain() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("a.b.co"));
    }
}
