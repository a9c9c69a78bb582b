//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Registration is the delicate operation: the role must be assigned from
//! the user count observed in the same transaction as the insert, and the
//! transaction takes a table lock so two racing first registrations cannot
//! both see an empty table. The unique email index remains the authority
//! for duplicates; its violation maps to the typed `DuplicateEmail` error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{PageNumber, Paginated};
use tracing::debug;

use crate::domain::ports::{NewUserRecord, UserPersistenceError, UserRepository};
use crate::domain::user::{EmailAddress, Role, User, UserId};

use super::pool::{DbPool, PoolError};
use super::rows::{user_from_row, NewUserRow, UserRow};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to user repository port errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to user repository port errors.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::NotFound,
        _ => UserPersistenceError::query("database error"),
    }
}

fn domain_user(row: UserRow) -> Result<User, UserPersistenceError> {
    user_from_row(row).map_err(UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert_registration(
        &self,
        registration: NewUserRecord,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted: UserRow = conn
            .transaction(|conn| {
                async move {
                    // Serialize concurrent registrations: SHARE ROW EXCLUSIVE
                    // conflicts with itself, so only one transaction at a time
                    // can run the count-then-insert below.
                    diesel::sql_query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
                        .execute(conn)
                        .await?;

                    let existing: i64 = users::table.count().get_result(conn).await?;
                    let role = Role::for_registration(u64::try_from(existing).unwrap_or(u64::MAX));

                    let row = NewUserRow {
                        id: registration.id.as_uuid(),
                        email: registration.email.as_ref().to_owned(),
                        password_hash: registration.password_hash.clone(),
                        name: registration.name.as_ref().to_owned(),
                        role: role.as_str().to_owned(),
                        created_at: registration.created_at,
                    };

                    diesel::insert_into(users::table)
                        .values(&row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        domain_user(inserted)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(domain_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(domain_user).transpose()
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(id.as_uuid()))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::NotFound);
        }
        Ok(())
    }

    async fn list_page(
        &self,
        page: PageNumber,
        per_page: u32,
    ) -> Result<Paginated<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::created_at.asc())
            .offset(page.offset(per_page))
            .limit(i64::from(per_page))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(domain_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Paginated::new(
            items,
            page,
            per_page,
            u64::try_from(total).unwrap_or(0),
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage; repository behaviour against a live database
    //! is represented by the stub-backed service tests in the domain.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint".to_owned()))
    }

    #[test]
    fn unique_violation_maps_to_duplicate_email() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(mapped, UserPersistenceError::DuplicateEmail);
    }

    #[test]
    fn closed_connection_maps_to_connection_error() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }

    #[test]
    fn not_found_maps_to_not_found() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            UserPersistenceError::NotFound
        );
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(
            mapped,
            UserPersistenceError::connection("timed out")
        );
    }
}
