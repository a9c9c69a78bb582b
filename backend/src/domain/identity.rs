//! Identity Registry: registration, lookup, and role administration.
//!
//! Registration owns the first-admin bootstrap invariant: the role is
//! assigned by the repository atomically with the insert (see
//! [`NewUserRecord`]), so this service never reads a count it could race
//! on. Passwords are hashed here, before the repository sees the record.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::credentials::Password;
use super::error::Error;
use super::ports::{NewUserRecord, PasswordHasher, UserPersistenceError, UserRepository};
use super::user::{DisplayName, EmailAddress, Role, User, UserId};

/// Registration and role administration over the user repository.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

/// Map user persistence failures to domain errors.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail => Error::duplicate_email(),
        UserPersistenceError::NotFound => Error::not_found("No such user."),
    }
}

impl IdentityService {
    /// Create a new service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a new account.
    ///
    /// The first user ever created becomes the root admin; everyone else
    /// starts as a visitor. A taken email yields
    /// [`crate::domain::ErrorCode::DuplicateEmail`].
    pub async fn register(
        &self,
        email: EmailAddress,
        password: &Password,
        name: DisplayName,
    ) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(password)
            .map_err(|err| Error::internal(err.to_string()))?;

        let registration = NewUserRecord {
            id: UserId::new_random(),
            email,
            password_hash,
            name,
            created_at: Utc::now(),
        };

        let user = self
            .users
            .insert_registration(registration)
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %user.id(), role = %user.role(), "registered new user");
        Ok(user)
    }

    /// Fetch a user by exact email.
    pub async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_persistence_error)
    }

    /// Fetch a user by identifier.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)
    }

    /// Toggle a user's role between Admin and Visitor.
    ///
    /// The root account is excluded: its role is never altered through this
    /// operation, and the toggle can never mint a new RootUser. Returns the
    /// role now in effect.
    pub async fn toggle_role(&self, subject: UserId) -> Result<Role, Error> {
        let user = self
            .users
            .find_by_id(subject)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("No such user."))?;

        if user.role() == Role::RootUser {
            return Err(Error::validation("The root account's role cannot be changed."));
        }

        let next = user.role().toggled();
        self.users
            .update_role(subject, next)
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %subject, from = %user.role(), to = %next, "toggled user role");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{StubHasher, StubUserRepository};
    use crate::domain::ErrorCode;

    fn service(repo: Arc<StubUserRepository>) -> IdentityService {
        IdentityService::new(repo, Arc::new(StubHasher))
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).expect("valid email")
    }

    fn name(raw: &str) -> DisplayName {
        DisplayName::new(raw).expect("valid name")
    }

    fn password() -> Password {
        Password::new("hunter2").expect("valid password")
    }

    #[tokio::test]
    async fn first_registration_becomes_root_admin() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo);

        let first = svc
            .register(email("a@x.com"), &password(), name("Ada"))
            .await
            .expect("first registration succeeds");
        let second = svc
            .register(email("b@x.com"), &password(), name("Bob"))
            .await
            .expect("second registration succeeds");

        assert_eq!(first.role(), Role::RootUser);
        assert_eq!(second.role(), Role::Visitor);
    }

    #[tokio::test]
    async fn exactly_one_root_across_many_registrations() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo.clone());

        for i in 0..10 {
            svc.register(
                email(&format!("user{i}@x.com")),
                &password(),
                name("User"),
            )
            .await
            .expect("registration succeeds");
        }

        let roots = repo
            .all_users()
            .iter()
            .filter(|u| u.role() == Role::RootUser)
            .count();
        assert_eq!(roots, 1);
    }

    #[tokio::test]
    async fn find_by_email_matches_exactly_or_not_at_all() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo);

        svc.register(email("Ada@x.com"), &password(), name("Ada"))
            .await
            .expect("registration succeeds");

        let found = svc
            .find_by_email(&email("Ada@x.com"))
            .await
            .expect("lookup succeeds");
        assert!(found.is_some());

        // Lookup is byte-exact: a different casing is a different account.
        let other_casing = svc
            .find_by_email(&email("ada@x.com"))
            .await
            .expect("lookup succeeds");
        assert!(other_casing.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_a_second_record() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo.clone());

        svc.register(email("a@x.com"), &password(), name("Ada"))
            .await
            .expect("first registration succeeds");
        let err = svc
            .register(email("a@x.com"), &password(), name("Imposter"))
            .await
            .expect_err("duplicate email must fail");

        assert_eq!(err.code(), ErrorCode::DuplicateEmail);
        assert_eq!(repo.all_users().len(), 1);
    }

    #[tokio::test]
    async fn stored_record_holds_a_hash_not_the_password() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo.clone());

        svc.register(email("a@x.com"), &password(), name("Ada"))
            .await
            .expect("registration succeeds");

        let stored = &repo.all_users()[0];
        assert_ne!(stored.password_hash(), "hunter2");
    }

    #[tokio::test]
    async fn toggle_flips_admin_and_visitor() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo.clone());

        svc.register(email("root@x.com"), &password(), name("Root"))
            .await
            .expect("root registration");
        let visitor = svc
            .register(email("v@x.com"), &password(), name("Visitor"))
            .await
            .expect("visitor registration");

        assert_eq!(
            svc.toggle_role(visitor.id()).await.expect("first toggle"),
            Role::Admin
        );
        assert_eq!(
            svc.toggle_role(visitor.id()).await.expect("second toggle"),
            Role::Visitor
        );
    }

    #[tokio::test]
    async fn toggle_refuses_the_root_account() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo.clone());

        let root = svc
            .register(email("root@x.com"), &password(), name("Root"))
            .await
            .expect("root registration");

        let err = svc
            .toggle_role(root.id())
            .await
            .expect_err("root toggle must fail");
        assert_eq!(err.code(), ErrorCode::Validation);
        assert_eq!(repo.all_users()[0].role(), Role::RootUser);
    }

    #[tokio::test]
    async fn toggle_on_unknown_user_is_not_found() {
        let repo = Arc::new(StubUserRepository::default());
        let svc = service(repo);

        let err = svc
            .toggle_role(UserId::new_random())
            .await
            .expect_err("unknown user must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
