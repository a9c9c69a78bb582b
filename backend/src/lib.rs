//! Server-rendered blog backend.
//!
//! Visitors read posts and comments; registered users authenticate through
//! cookie sessions; elevated roles (the self-bootstrapped RootUser and
//! promoted Admins) manage posts and other users. The crate is organised
//! hexagonally: `domain` owns the entities, services, guards, and ports;
//! `inbound::http` adapts them to actix-web pages; `outbound` provides the
//! Diesel, Argon2, and HTML-renderer adapters.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
