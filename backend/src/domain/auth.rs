//! Credential verification for the login flow.
//!
//! The single failure outcome is deliberate: an unknown email and a wrong
//! password are indistinguishable to the caller, and the unknown-email path
//! still performs one hash verification so the two cost the same.

use std::sync::Arc;

use tracing::debug;

use super::credentials::LoginCredentials;
use super::error::Error;
use super::identity::map_user_persistence_error;
use super::ports::{PasswordHasher, UserRepository};
use super::user::User;

/// Verifies submitted credentials against stored hashes.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    /// Create a new service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Authenticate an email/password pair.
    ///
    /// Returns the matched user, or
    /// [`crate::domain::ErrorCode::InvalidCredentials`] with no indication
    /// of which field was wrong.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;

        match user {
            Some(user) => {
                if self
                    .hasher
                    .verify(credentials.password(), user.password_hash())
                {
                    Ok(user)
                } else {
                    debug!("password mismatch");
                    Err(Error::invalid_credentials())
                }
            }
            None => {
                // Burn the same verification work as the mismatch path.
                let _ = self
                    .hasher
                    .verify(credentials.password(), self.hasher.dummy_hash());
                debug!("unknown email");
                Err(Error::invalid_credentials())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::Password;
    use crate::domain::identity::IdentityService;
    use crate::domain::test_support::{StubHasher, StubUserRepository};
    use crate::domain::user::{DisplayName, EmailAddress};
    use crate::domain::ErrorCode;

    async fn seeded() -> (AuthService, Arc<StubUserRepository>) {
        let repo = Arc::new(StubUserRepository::default());
        let identity = IdentityService::new(repo.clone(), Arc::new(StubHasher));
        identity
            .register(
                EmailAddress::new("a@x.com").expect("valid email"),
                &Password::new("correct-horse").expect("valid password"),
                DisplayName::new("Ada").expect("valid name"),
            )
            .await
            .expect("seed registration");
        (AuthService::new(repo.clone(), Arc::new(StubHasher)), repo)
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid credentials")
    }

    #[tokio::test]
    async fn correct_credentials_authenticate() {
        let (auth, _repo) = seeded().await;
        let user = auth
            .authenticate(&credentials("a@x.com", "correct-horse"))
            .await
            .expect("authentication succeeds");
        assert_eq!(user.email().as_ref(), "a@x.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let (auth, _repo) = seeded().await;

        let wrong_password = auth
            .authenticate(&credentials("a@x.com", "wrong"))
            .await
            .expect_err("wrong password must fail");
        let unknown_email = auth
            .authenticate(&credentials("nobody@x.com", "correct-horse"))
            .await
            .expect_err("unknown email must fail");

        assert_eq!(wrong_password.code(), ErrorCode::InvalidCredentials);
        assert_eq!(unknown_email, wrong_password);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let (auth, _repo) = seeded().await;
        let err = auth
            .authenticate(&credentials("A@x.com", "correct-horse"))
            .await
            .expect_err("different casing is a different account");
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    }
}
