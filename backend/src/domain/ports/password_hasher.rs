//! Port abstraction for the credential store.
//!
//! No other component touches raw passwords: the identity service hands a
//! [`Password`] to this port and stores only the opaque hash string it
//! returns.

use crate::domain::credentials::Password;

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing backend failed (salt generation or parameter errors).
    #[error("password hashing failed: {message}")]
    Hash { message: String },
}

impl PasswordHashError {
    /// Create a hash error with the given message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

pub trait PasswordHasher: Send + Sync {
    /// Produce a salted one-way hash (PHC string) of the password.
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError>;

    /// Verify a password against a stored hash.
    ///
    /// Must cost the same effort whether the mismatch is in the salt, the
    /// digest, or the password itself; callers rely on this to keep login
    /// failures indistinguishable.
    fn verify(&self, password: &Password, stored_hash: &str) -> bool;

    /// A well-formed hash of a throwaway password.
    ///
    /// Login verifies against this when the email is unknown so the absent
    /// and present user paths burn the same work.
    fn dummy_hash(&self) -> &str;
}
