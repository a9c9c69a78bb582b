//! HTTP inbound adapter: the server-rendered page surface.
//!
//! Every handler follows the same shape: resolve the session user, invoke
//! the relevant guard explicitly, call a domain service or repository port,
//! then either redirect with a flash or hand a [`Page`] to the renderer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod forms;
pub mod health;
pub mod pages;
pub mod posts;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use self::error::{PageError, PageResult};
pub use self::session::SessionContext;
pub use self::state::HttpState;

use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;

use crate::domain::ports::{
    CommentPersistenceError, Flash, Page, PageChrome, PostPersistenceError,
};
use crate::domain::{Error, User};

/// Redirect issued after a state-changing POST (see-other) or a denied GET.
pub(crate) fn redirect_to(path: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, path.to_owned()))
        .finish()
}

/// Push the error's message as a flash and redirect to its recovery path.
///
/// Falls back to home when the error carries no hint; the recoverable
/// taxonomy always does.
pub(crate) fn flash_and_redirect(session: &SessionContext, err: &Error) -> PageResult<HttpResponse> {
    session.push_flash(Flash::error(err.message()))?;
    Ok(redirect_to(err.redirect().unwrap_or("/")))
}

/// Resolve the session token to its user, if any.
///
/// A stale id (user since removed) reads as signed out rather than a fault.
pub(crate) async fn current_user(
    state: &HttpState,
    session: &SessionContext,
) -> PageResult<Option<User>> {
    let Some(id) = session.user_id()? else {
        return Ok(None);
    };
    Ok(state.identity.find_by_id(id).await?)
}

/// Assemble the shared page furniture, draining pending flashes.
pub(crate) fn chrome_for(
    session: &SessionContext,
    user: Option<&User>,
) -> PageResult<PageChrome> {
    Ok(PageChrome {
        flashes: session.take_flashes()?,
        current_user: user.map(|u| u.name().as_ref().to_owned()),
        elevated: user.is_some_and(|u| u.role().is_elevated()),
    })
}

/// Render a page to a 200 HTML response.
pub(crate) fn render_page(state: &HttpState, page: &Page) -> PageResult<HttpResponse> {
    let html = state
        .renderer
        .render(page)
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Render the 404 page.
pub(crate) fn render_not_found(
    state: &HttpState,
    chrome: PageChrome,
) -> PageResult<HttpResponse> {
    let html = state
        .renderer
        .render(&Page::NotFound { chrome })
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Map post persistence failures to domain errors.
pub(crate) fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => Error::service_unavailable(message),
        PostPersistenceError::Query { message } => Error::internal(message),
        PostPersistenceError::DuplicateTitle => {
            Error::validation("A post with that title already exists.")
        }
        PostPersistenceError::NotFound => Error::not_found("No such post."),
    }
}

/// Map comment persistence failures to domain errors.
pub(crate) fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => Error::service_unavailable(message),
        CommentPersistenceError::Query { message } => Error::internal(message),
        CommentPersistenceError::PostNotFound => Error::not_found("No such post."),
    }
}
