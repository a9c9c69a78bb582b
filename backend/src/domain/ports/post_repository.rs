//! Port abstraction for post persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::post::{Post, PostId};

/// Persistence errors raised by post repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostPersistenceError {
    /// Repository connection could not be established.
    #[error("post repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("post repository query failed: {message}")]
    Query { message: String },

    /// The unique title constraint rejected an insert or update.
    #[error("a post with that title already exists")]
    DuplicateTitle,

    /// The referenced post id does not exist.
    #[error("post not found")]
    NotFound,
}

impl PostPersistenceError {
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
pub trait PostRepository: Send + Sync {
    /// All posts, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, PostPersistenceError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Insert a new post. The unique title constraint surfaces as
    /// [`PostPersistenceError::DuplicateTitle`].
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Overwrite an existing post (including its reassigned author).
    async fn update(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Delete a post and all of its comments in one transaction.
    ///
    /// The comment relation does not cascade on its own; adapters must
    /// remove children explicitly so no orphaned comment stays queryable.
    async fn delete_with_comments(&self, id: PostId) -> Result<(), PostPersistenceError>;
}
