//! Ports: the narrow interfaces collaborators implement.
//!
//! The domain owns these traits; outbound adapters (Diesel, Argon2, the
//! HTML renderer) implement them, and inbound handlers depend on nothing
//! else. Each port defines its own error enum so adapter failures reach the
//! domain typed, never as raw library errors.

mod comment_repository;
mod page_renderer;
mod password_hasher;
mod post_repository;
mod user_repository;

pub use self::comment_repository::{CommentPersistenceError, CommentRepository};
pub use self::page_renderer::{
    AuthFormView, CommentView, Flash, FlashLevel, Page, PageChrome, PageRenderer, PostDetailView,
    PostFormView, PostSummaryView, RenderError, UserRowView,
};
pub use self::password_hasher::{PasswordHashError, PasswordHasher};
pub use self::post_repository::{PostPersistenceError, PostRepository};
pub use self::user_repository::{NewUserRecord, UserPersistenceError, UserRepository};
