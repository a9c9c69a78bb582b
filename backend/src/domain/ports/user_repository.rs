//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{PageNumber, Paginated};

use crate::domain::user::{DisplayName, EmailAddress, Role, User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },

    /// The unique email constraint rejected an insert.
    #[error("email is already registered")]
    DuplicateEmail,

    /// The referenced user id does not exist.
    #[error("user not found")]
    NotFound,
}

impl UserPersistenceError {
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

/// The fields of a registration pending insertion.
///
/// Deliberately role-less: the adapter assigns the role atomically with the
/// insert via [`Role::for_registration`] so two racing first registrations
/// cannot both observe an empty table.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Pre-minted identifier.
    pub id: UserId,
    /// Unique login email.
    pub email: EmailAddress,
    /// PHC password hash; the repository never sees a plaintext password.
    pub password_hash: String,
    /// Display name.
    pub name: DisplayName,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a registration, assigning the role from the current user
    /// count inside one serialized transaction. Returns the stored user or
    /// [`UserPersistenceError::DuplicateEmail`] if the email is taken.
    async fn insert_registration(
        &self,
        registration: NewUserRecord,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact (case-sensitive) email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite a user's role. Last write wins under concurrency.
    async fn update_role(&self, id: UserId, role: Role) -> Result<(), UserPersistenceError>;

    /// One page of users in registration order, plus the total count.
    async fn list_page(
        &self,
        page: PageNumber,
        per_page: u32,
    ) -> Result<Paginated<User>, UserPersistenceError>;
}
