//! Form and query DTOs for the server-rendered pages.
//!
//! These structs only carry raw strings off the wire; validation happens at
//! the domain boundary (`EmailAddress`, `Password`, `PostDraft`, ...) so
//! every handler applies identical rules.

use serde::Deserialize;

/// `POST /register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    /// Display name field.
    pub name: String,
    /// Email field.
    pub email: String,
    /// Password field.
    pub password: String,
}

/// `POST /login` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    /// Email field.
    pub email: String,
    /// Password field.
    pub password: String,
}

/// `?next=` carried through the login flow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    /// The originally requested path, if access was denied somewhere.
    pub next: Option<String>,
}

/// `POST /post/{id}` comment body.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    /// Comment text field.
    pub body: String,
}

/// `POST /new-post` and `POST /edit-post/{id}` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PostForm {
    /// Headline field.
    pub title: String,
    /// Secondary headline field.
    pub subtitle: String,
    /// Header image reference field.
    pub image_url: String,
    /// Body field.
    pub body: String,
}

/// `?page=` on the admin listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number; absent or zero means the first page.
    pub page: Option<u32>,
}

/// `?user_id=` on the role-toggle action.
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdQuery {
    /// The user whose role to toggle.
    pub user_id: String,
}
