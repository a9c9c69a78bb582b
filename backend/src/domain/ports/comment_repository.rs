//! Port abstraction for comment persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::post::PostId;

/// Persistence errors raised by comment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentPersistenceError {
    /// Repository connection could not be established.
    #[error("comment repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("comment repository query failed: {message}")]
    Query { message: String },

    /// The referenced post vanished before the comment landed.
    #[error("commented post no longer exists")]
    PostNotFound,
}

impl CommentPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a submitted comment. A foreign-key violation on the post
    /// surfaces as [`CommentPersistenceError::PostNotFound`].
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError>;

    /// All comments on a post, newest first.
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentPersistenceError>;
}
