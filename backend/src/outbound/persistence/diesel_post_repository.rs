//! PostgreSQL-backed `PostRepository` implementation using Diesel.
//!
//! Deletion removes the post's comments in the same transaction; the
//! comment relation carries no `ON DELETE CASCADE`, so the adapter is
//! responsible for leaving no orphans behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::post::{Post, PostId};

use super::pool::{DbPool, PoolError};
use super::rows::{post_from_row, NewPostRow, PostRow};
use super::schema::{blog_posts, comments};

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to post repository port errors.
fn map_pool_error(error: PoolError) -> PostPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PostPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to post repository port errors.
fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PostPersistenceError::DuplicateTitle
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PostPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => PostPersistenceError::NotFound,
        _ => PostPersistenceError::query("database error"),
    }
}

fn domain_post(row: PostRow) -> Result<Post, PostPersistenceError> {
    post_from_row(row).map_err(PostPersistenceError::query)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = blog_posts::table
            .order(blog_posts::created_at.desc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(domain_post).collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PostRow> = blog_posts::table
            .find(id.as_uuid())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(domain_post).transpose()
    }

    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(blog_posts::table)
            .values(NewPostRow::from_post(post))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow::from_post(post);
        let updated = diesel::update(blog_posts::table.find(post.id().as_uuid()))
            .set((
                blog_posts::title.eq(row.title),
                blog_posts::subtitle.eq(row.subtitle),
                blog_posts::body.eq(row.body),
                blog_posts::image_url.eq(row.image_url),
                blog_posts::author_id.eq(row.author_id),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PostPersistenceError::NotFound);
        }
        Ok(())
    }

    async fn delete_with_comments(&self, id: PostId) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = conn
            .transaction(|conn| {
                async move {
                    // Children first: the FK has no cascade.
                    diesel::delete(comments::table.filter(comments::post_id.eq(id.as_uuid())))
                        .execute(conn)
                        .await?;
                    diesel::delete(blog_posts::table.find(id.as_uuid()))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(PostPersistenceError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage for the post adapter.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint".to_owned()))
    }

    #[test]
    fn unique_violation_maps_to_duplicate_title() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(mapped, PostPersistenceError::DuplicateTitle);
    }

    #[test]
    fn not_found_maps_to_not_found() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            PostPersistenceError::NotFound
        );
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::build("bad url"));
        assert_eq!(mapped, PostPersistenceError::connection("bad url"));
    }
}
