//! In-memory stub ports shared by domain unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use pagination::{PageNumber, Paginated};

use super::credentials::Password;
use super::ports::{
    NewUserRecord, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use super::user::{EmailAddress, Role, User, UserId};

/// Mutex-backed user store with the same atomicity contract as the Diesel
/// adapter: the count-and-insert of a registration happens under one lock.
#[derive(Default)]
pub struct StubUserRepository {
    users: Mutex<Vec<User>>,
    fail_with: Mutex<Option<UserPersistenceError>>,
}

impl StubUserRepository {
    /// Snapshot of every stored user.
    pub fn all_users(&self) -> Vec<User> {
        self.users.lock().expect("users lock").clone()
    }

    /// Make every subsequent call fail with the given error.
    pub fn fail_with(&self, error: UserPersistenceError) {
        *self.fail_with.lock().expect("failure lock") = Some(error);
    }

    fn check_failure(&self) -> Result<(), UserPersistenceError> {
        match self.fail_with.lock().expect("failure lock").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn insert_registration(
        &self,
        registration: NewUserRecord,
    ) -> Result<User, UserPersistenceError> {
        self.check_failure()?;
        let mut users = self.users.lock().expect("users lock");
        if users.iter().any(|u| u.email() == &registration.email) {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        let role = Role::for_registration(users.len() as u64);
        let user = User::new(
            registration.id,
            registration.email,
            registration.password_hash,
            registration.name,
            role,
            registration.created_at,
        );
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        self.check_failure()?;
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.check_failure()?;
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|u| u.email() == email).cloned())
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<(), UserPersistenceError> {
        self.check_failure()?;
        let mut users = self.users.lock().expect("users lock");
        let Some(user) = users.iter_mut().find(|u| u.id() == id) else {
            return Err(UserPersistenceError::NotFound);
        };
        *user = User::new(
            user.id(),
            user.email().clone(),
            user.password_hash().to_owned(),
            user.name().clone(),
            role,
            user.created_at(),
        );
        Ok(())
    }

    async fn list_page(
        &self,
        page: PageNumber,
        per_page: u32,
    ) -> Result<Paginated<User>, UserPersistenceError> {
        self.check_failure()?;
        let users = self.users.lock().expect("users lock");
        let total = users.len() as u64;
        let offset = usize::try_from(page.offset(per_page)).unwrap_or(usize::MAX);
        let items = users
            .iter()
            .skip(offset)
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok(Paginated::new(items, page, per_page, total))
    }
}

/// Transparent "hash" for tests: reversible by eye, stable to verify.
pub struct StubHasher;

impl PasswordHasher for StubHasher {
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        Ok(format!("stub-hash:{}", password.expose()))
    }

    fn verify(&self, password: &Password, stored_hash: &str) -> bool {
        stored_hash == format!("stub-hash:{}", password.expose())
    }

    fn dummy_hash(&self) -> &str {
        "stub-hash:dummy"
    }
}
