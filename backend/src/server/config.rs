//! Server configuration sourced from the environment.
//!
//! Three variables matter: `SESSION_SECRET` (cookie signing key material),
//! `DATABASE_URL`, and optionally `BIND_ADDR`. A missing or short secret
//! refuses to start in a production posture; debug builds (or an explicit
//! `SESSION_ALLOW_EPHEMERAL=1`) fall back to a temporary key with a
//! warning, which signs sessions that die with the process.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;

/// Minimum secret length accepted for key derivation.
const MIN_SECRET_LEN: usize = 32;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `SESSION_SECRET` is absent and no dev fallback applies.
    #[error("SESSION_SECRET is not set; refusing to sign sessions with an ephemeral key")]
    MissingSessionSecret,

    /// `SESSION_SECRET` is too short to derive a signing key from.
    #[error("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes")]
    WeakSessionSecret,

    /// `DATABASE_URL` is absent.
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    /// `BIND_ADDR` could not be parsed as a socket address.
    #[error("BIND_ADDR is not a valid socket address: {message}")]
    InvalidBindAddr { message: String },
}

/// Resolved server configuration.
pub struct ServerConfig {
    /// Session cookie signing key.
    pub key: Key,
    /// Whether the session cookie carries the `Secure` flag.
    pub cookie_secure: bool,
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = session_key()?;

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                message: err.to_string(),
            })?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            key,
            cookie_secure,
            bind_addr,
            database_url,
        })
    }
}

fn session_key() -> Result<Key, ConfigError> {
    match env::var("SESSION_SECRET") {
        Ok(secret) => {
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::WeakSessionSecret);
            }
            Ok(Key::derive_from(secret.as_bytes()))
        }
        Err(_) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!("SESSION_SECRET not set, using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(ConfigError::MissingSessionSecret)
            }
        }
    }
}
