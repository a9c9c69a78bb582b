//! Backend entry-point: wires configuration, persistence, and the page
//! routes into an actix-web server.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::HttpState;
use backend::outbound::hashing::Argon2PasswordHasher;
use backend::outbound::persistence::{
    run_migrations, DbPool, DieselCommentRepository, DieselPostRepository, DieselUserRepository,
    PoolConfig,
};
use backend::outbound::render::BasicPageRenderer;
use backend::server::{pages, session_middleware, ServerConfig};
use backend::Trace;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    run_migrations(&config.database_url).map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;

    let hasher = Argon2PasswordHasher::new().map_err(std::io::Error::other)?;
    let state = HttpState::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselPostRepository::new(pool.clone())),
        Arc::new(DieselCommentRepository::new(pool)),
        Arc::new(hasher),
        Arc::new(BasicPageRenderer::new()),
    );

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .wrap(session_middleware(key.clone(), cookie_secure))
            .configure(pages)
            .service(ready)
            .service(live)
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
