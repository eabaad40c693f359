use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum post content length, counted after trimming.
pub const MAX_CONTENT_LEN: usize = 5000;
/// Maximum comment text length, counted after trimming.
pub const MAX_COMMENT_LEN: usize = 1000;

/// A comment embedded in a post. Comments are append-only and keep their
/// insertion order; they are never edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Post entity - a short text post with embedded likes and comments.
///
/// `author_id` and `author_username` are snapshots taken at creation time;
/// they are never re-synced with later profile changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub is_public: bool,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by the given author.
    pub fn new(author_id: Uuid, author_username: String, content: String, is_public: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            author_username,
            content,
            is_public,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership check: ids are compared as typed `Uuid` values.
    pub fn ensure_author(&self, caller_id: Uuid) -> Result<(), DomainError> {
        if self.author_id == caller_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    /// A private post is visible only to its author.
    pub fn is_visible_to(&self, caller_id: Uuid) -> bool {
        self.is_public || self.author_id == caller_id
    }

    /// Toggle the caller's like: adds the id when absent, removes it when
    /// present. Returns `true` when the post is liked after the call.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        self.updated_at = Utc::now();
        if let Some(pos) = self.likes.iter().position(|id| *id == user_id) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(user_id);
            true
        }
    }

    /// Append a comment with a server-assigned timestamp.
    pub fn add_comment(&mut self, author_id: Uuid, author_username: String, text: String) {
        let now = Utc::now();
        self.updated_at = now;
        self.comments.push(Comment {
            author_id,
            author_username,
            text,
            created_at: now,
        });
    }
}

/// Validate post content: non-empty and at most [`MAX_CONTENT_LEN`] chars
/// after trimming. Returns the trimmed content.
pub fn validate_content(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("Content is required".to_string()));
    }
    if trimmed.chars().count() > MAX_CONTENT_LEN {
        return Err(DomainError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate comment text: non-empty and at most [`MAX_COMMENT_LEN`] chars
/// after trimming. Returns the trimmed text.
pub fn validate_comment_text(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "Comment text is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(DomainError::Validation(format!(
            "Comment text must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
