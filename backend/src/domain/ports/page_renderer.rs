//! Port abstraction for the page renderer collaborator.
//!
//! Handlers assemble a [`Page`] of plain view models and hand it to the
//! renderer; swapping the built-in HTML adapter for a template engine must
//! not touch handlers or domain code. View models are strings and ids only,
//! pre-flattened so the renderer needs no repository access.

use pagination::Paginated;
use serde::{Deserialize, Serialize};

/// Errors raised while rendering a page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The renderer could not produce markup for the page.
    #[error("page rendering failed: {message}")]
    Render { message: String },
}

impl RenderError {
    /// Create a render error with the given message.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

/// Severity of a flash message; drives styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    /// A recoverable problem the user should fix.
    Error,
    /// Neutral confirmation.
    Info,
}

/// A one-shot message carried through the session to the next render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Styling severity.
    pub level: FlashLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Flash {
    /// An error-level flash.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// An info-level flash.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }
}

/// Shared page furniture: pending flashes and the signed-in user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageChrome {
    /// Flashes drained from the session for this render.
    pub flashes: Vec<Flash>,
    /// Display name of the signed-in user.
    pub current_user: Option<String>,
    /// Whether the signed-in user holds an elevated role (shows admin nav).
    pub elevated: bool,
}

/// One post row on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummaryView {
    /// Post id, for the detail link.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Secondary headline.
    pub subtitle: String,
    /// Author display name.
    pub author: String,
    /// Human-facing publication date.
    pub published_on: String,
}

/// The full post on its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetailView {
    /// Post id, for form targets.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Secondary headline.
    pub subtitle: String,
    /// Body markup.
    pub body: String,
    /// Header image reference.
    pub image_url: String,
    /// Author display name.
    pub author: String,
    /// Human-facing publication date.
    pub published_on: String,
}

/// One comment under a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    /// Commentator display name.
    pub author: String,
    /// Comment text.
    pub body: String,
}

/// Redisplay values for the register/login forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormView {
    /// Previously submitted email, redisplayed after a validation failure.
    pub email: String,
    /// Previously submitted display name (register form only).
    pub name: String,
}

/// Redisplay values for the new-post/edit-post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFormView {
    /// Headline field.
    pub title: String,
    /// Secondary headline field.
    pub subtitle: String,
    /// Body field.
    pub body: String,
    /// Image reference field.
    pub image_url: String,
}

/// One user row in the admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRowView {
    /// User id, for the role-toggle form target.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Current role label.
    pub role: String,
    /// Whether the listing shows a toggle control (RootUser is immutable).
    pub can_toggle: bool,
}

/// Every page the application renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// `GET /`: all posts, newest first.
    PostIndex {
        /// Shared furniture.
        chrome: PageChrome,
        /// Post rows.
        posts: Vec<PostSummaryView>,
    },
    /// `GET /post/{id}`: one post with its comments and comment form.
    PostDetail {
        /// Shared furniture.
        chrome: PageChrome,
        /// The post.
        post: PostDetailView,
        /// Comments, newest first.
        comments: Vec<CommentView>,
    },
    /// `GET /register`: the registration form.
    Register {
        /// Shared furniture.
        chrome: PageChrome,
        /// Redisplay values.
        form: AuthFormView,
    },
    /// `GET /login`: the login form, optionally carrying a `next` target.
    Login {
        /// Shared furniture.
        chrome: PageChrome,
        /// Redisplay values.
        form: AuthFormView,
        /// Forwarding target resubmitted with the form.
        next: Option<String>,
    },
    /// `GET /new-post` and `GET /edit-post/{id}`: the post form.
    PostForm {
        /// Shared furniture.
        chrome: PageChrome,
        /// Field values (empty for a new post).
        form: PostFormView,
        /// Edit target id; `None` renders the new-post variant.
        edit_id: Option<String>,
    },
    /// `GET /admin`: paginated user listing with role toggles.
    AdminUsers {
        /// Shared furniture.
        chrome: PageChrome,
        /// One page of user rows.
        users: Paginated<UserRowView>,
    },
    /// `GET /about`: static content.
    About {
        /// Shared furniture.
        chrome: PageChrome,
    },
    /// `GET /contact`: static content.
    Contact {
        /// Shared furniture.
        chrome: PageChrome,
    },
    /// 404 page for absent posts and users.
    NotFound {
        /// Shared furniture.
        chrome: PageChrome,
    },
}

pub trait PageRenderer: Send + Sync {
    /// Produce the full HTML document for a page.
    fn render(&self, page: &Page) -> Result<String, RenderError>;
}
