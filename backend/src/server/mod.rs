//! Application assembly: route registration and session middleware.

pub mod config;

pub use self::config::{ConfigError, ServerConfig};

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::web;

use crate::inbound::http::{admin, auth, pages as static_pages, posts};

/// Cookie-backed session middleware with the production cookie attributes.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Register every page route.
///
/// Tests call this against an app carrying stub-backed [`HttpState`] and a
/// test session middleware; `main` uses it with the Diesel adapters.
///
/// [`HttpState`]: crate::inbound::http::HttpState
pub fn pages(cfg: &mut web::ServiceConfig) {
    cfg.service(posts::post_index)
        .service(posts::show_post)
        .service(posts::submit_comment)
        .service(posts::new_post_form)
        .service(posts::new_post_submit)
        .service(posts::edit_post_form)
        .service(posts::edit_post_submit)
        .service(posts::delete_post)
        .service(auth::register_form)
        .service(auth::register_submit)
        .service(auth::login_form)
        .service(auth::login_submit)
        .service(auth::logout)
        .service(admin::admin_users)
        .service(admin::change_role)
        .service(static_pages::about)
        .service(static_pages::contact);
}
