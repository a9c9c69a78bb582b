//! Comment entity: reader feedback attached to a post.
//!
//! Comments are write-once; no exposed operation edits or deletes a single
//! comment. They disappear only when their post is deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::post::PostId;
use super::user::UserId;

/// Stable comment identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Mint a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID read back from the database.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// Validation errors for the comment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    /// Comment text was empty after trimming.
    #[error("comment must not be empty")]
    EmptyBody,
    /// Comment text exceeded the stored column width.
    #[error("comment must be at most 1000 characters")]
    BodyTooLong,
}

/// Validated comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentBody(String);

impl CommentBody {
    const MAX_LEN: usize = 1000;

    /// Validate raw comment text.
    pub fn new(raw: &str) -> Result<Self, CommentValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CommentValidationError::EmptyBody);
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(CommentValidationError::BodyTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A comment left on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    body: CommentBody,
    commentator_id: UserId,
    post_id: PostId,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Assemble a comment record from its parts.
    pub fn new(
        id: CommentId,
        body: CommentBody,
        commentator_id: UserId,
        post_id: PostId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            body,
            commentator_id,
            post_id,
            created_at,
        }
    }

    /// Create a fresh comment by `commentator_id` on `post_id`.
    pub fn submitted(
        body: CommentBody,
        commentator_id: UserId,
        post_id: PostId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::new_random(),
            body,
            commentator_id,
            post_id,
            created_at: now,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Comment text.
    pub fn body(&self) -> &CommentBody {
        &self.body
    }

    /// The commenting user.
    pub fn commentator_id(&self) -> UserId {
        self.commentator_id
    }

    /// The post this comment belongs to.
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Submission timestamp; post pages list newest first.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comments_are_rejected() {
        assert_eq!(CommentBody::new("  "), Err(CommentValidationError::EmptyBody));
    }

    #[test]
    fn oversized_comments_are_rejected() {
        let raw = "x".repeat(1001);
        assert_eq!(CommentBody::new(&raw), Err(CommentValidationError::BodyTooLong));
    }

    #[test]
    fn submitted_comment_references_post_and_commentator() {
        let commentator = UserId::new_random();
        let post = PostId::new_random();
        let comment = Comment::submitted(
            CommentBody::new("nice read").expect("valid body"),
            commentator,
            post,
            Utc::now(),
        );
        assert_eq!(comment.commentator_id(), commentator);
        assert_eq!(comment.post_id(), post);
        assert_eq!(comment.body().as_ref(), "nice read");
    }
}
