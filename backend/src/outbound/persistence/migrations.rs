//! Embedded schema migrations run once at startup.
//!
//! The migration SQL is create-if-absent throughout, so re-running against
//! an already-provisioned database is a no-op and never clobbers data.
//! Migrations use a short-lived synchronous connection; the async pool is
//! built afterwards.

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

/// All migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while preparing the schema.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not connect to the database.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },

    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Apply { message: String },
}

/// Apply any pending migrations against `database_url`.
pub fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;

    if applied.is_empty() {
        info!("schema already up to date");
    } else {
        info!(count = applied.len(), "applied schema migrations");
    }
    Ok(())
}
