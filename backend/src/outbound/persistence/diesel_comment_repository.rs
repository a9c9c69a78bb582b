//! PostgreSQL-backed `CommentRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::comment::Comment;
use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::post::PostId;

use super::pool::{DbPool, PoolError};
use super::rows::{comment_from_row, CommentRow, NewCommentRow};
use super::schema::comments;

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to comment repository port errors.
fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CommentPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to comment repository port errors.
fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        // The only FK a comment insert can trip after the handler loaded the
        // post is the post itself vanishing underneath it.
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            CommentPersistenceError::PostNotFound
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CommentPersistenceError::connection("database connection error")
        }
        _ => CommentPersistenceError::query("database error"),
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comments::table)
            .values(NewCommentRow::from_comment(comment))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(post.as_uuid()))
            .order(comments::created_at.desc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| comment_from_row(row).map_err(CommentPersistenceError::query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage for the comment adapter.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    #[test]
    fn foreign_key_violation_maps_to_post_not_found() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("comments_post_id_fkey".to_owned()),
        );
        assert_eq!(map_diesel_error(error), CommentPersistenceError::PostNotFound);
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, CommentPersistenceError::connection("timed out"));
    }
}
