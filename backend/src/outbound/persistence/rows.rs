//! Row structs bridging Diesel and the domain entities.
//!
//! Rows are dumb data: all invariants live in the domain constructors the
//! conversion functions call. A stored value that no longer passes domain
//! validation is reported as a query error rather than smuggled through.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::comment::{Comment, CommentBody, CommentId};
use crate::domain::post::{Post, PostId, PostTitle};
use crate::domain::user::{DisplayName, EmailAddress, Role, User, UserId};

use super::schema::{blog_posts, comments, users};

/// A `users` row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// A `users` row pending insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Convert a stored user row into the domain entity.
///
/// An unrecognised role label is treated as Visitor with a warning rather
/// than failing the whole page; the other fields re-run their domain
/// validation and fail loudly, since they were validated on the way in.
pub fn user_from_row(row: UserRow) -> Result<User, String> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| format!("stored email invalid for user {}: {err}", row.id))?;
    let name = DisplayName::new(&row.name)
        .map_err(|err| format!("stored name invalid for user {}: {err}", row.id))?;
    let role = Role::parse(&row.role).unwrap_or_else(|| {
        warn!(user_id = %row.id, role = %row.role, "unrecognised role label, treating as Visitor");
        Role::Visitor
    });
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        row.password_hash,
        name,
        role,
        row.created_at,
    ))
}

/// A `blog_posts` row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blog_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image_url: String,
    pub published_on: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A `blog_posts` row pending insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blog_posts)]
pub struct NewPostRow {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image_url: String,
    pub published_on: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl NewPostRow {
    /// Flatten a domain post for insertion or update.
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id().as_uuid(),
            title: post.title().as_ref().to_owned(),
            subtitle: post.subtitle().to_owned(),
            body: post.body().to_owned(),
            image_url: post.image_url().to_owned(),
            published_on: post.published_on().to_owned(),
            author_id: post.author_id().as_uuid(),
            created_at: post.created_at(),
        }
    }
}

/// Convert a stored post row into the domain entity.
pub fn post_from_row(row: PostRow) -> Result<Post, String> {
    let title = PostTitle::new(&row.title)
        .map_err(|err| format!("stored title invalid for post {}: {err}", row.id))?;
    Ok(Post::new(
        PostId::from_uuid(row.id),
        title,
        row.subtitle,
        row.body,
        row.image_url,
        row.published_on,
        UserId::from_uuid(row.author_id),
        row.created_at,
    ))
}

/// A `comments` row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: Uuid,
    pub body: String,
    pub commentator_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A `comments` row pending insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow {
    pub id: Uuid,
    pub body: String,
    pub commentator_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl NewCommentRow {
    /// Flatten a domain comment for insertion.
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            id: comment.id().as_uuid(),
            body: comment.body().as_ref().to_owned(),
            commentator_id: comment.commentator_id().as_uuid(),
            post_id: comment.post_id().as_uuid(),
            created_at: comment.created_at(),
        }
    }
}

/// Convert a stored comment row into the domain entity.
pub fn comment_from_row(row: CommentRow) -> Result<Comment, String> {
    let body = CommentBody::new(&row.body)
        .map_err(|err| format!("stored body invalid for comment {}: {err}", row.id))?;
    Ok(Comment::new(
        CommentId::from_uuid(row.id),
        body,
        UserId::from_uuid(row.commentator_id),
        PostId::from_uuid(row.post_id),
        row.created_at,
    ))
}
