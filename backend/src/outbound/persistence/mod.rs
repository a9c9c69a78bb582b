//! Outbound persistence adapters: Diesel over PostgreSQL.
//!
//! Each repository adapter implements one domain port and translates pool
//! and Diesel failures into that port's typed errors. The schema mirrors
//! the domain entities with id-based foreign keys only.

mod diesel_comment_repository;
mod diesel_post_repository;
mod diesel_user_repository;
pub mod migrations;
pub mod pool;
pub mod rows;
pub mod schema;

pub use self::diesel_comment_repository::DieselCommentRepository;
pub use self::diesel_post_repository::DieselPostRepository;
pub use self::diesel_user_repository::DieselUserRepository;
pub use self::migrations::{run_migrations, MigrationError};
pub use self::pool::{DbPool, PoolConfig, PoolError};
