//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on domain ports and services and remain testable with in-memory
//! stubs.

use std::sync::Arc;

use crate::domain::ports::{CommentRepository, PageRenderer, PasswordHasher, PostRepository, UserRepository};
use crate::domain::{AuthService, IdentityService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and role administration.
    pub identity: IdentityService,
    /// Credential verification for login.
    pub auth: AuthService,
    /// User listing and lookups.
    pub users: Arc<dyn UserRepository>,
    /// Post CRUD.
    pub posts: Arc<dyn PostRepository>,
    /// Comment CRUD.
    pub comments: Arc<dyn CommentRepository>,
    /// Page rendering collaborator.
    pub renderer: Arc<dyn PageRenderer>,
}

impl HttpState {
    /// Assemble the state from port implementations.
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        hasher: Arc<dyn PasswordHasher>,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        Self {
            identity: IdentityService::new(users.clone(), hasher.clone()),
            auth: AuthService::new(users.clone(), hasher),
            users,
            posts,
            comments,
            renderer,
        }
    }
}
