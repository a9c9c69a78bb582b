//! Static pages.

use actix_web::{get, web, HttpResponse};

use crate::domain::ports::Page;

use super::{chrome_for, current_user, render_page, HttpState, PageResult, SessionContext};

/// `GET /about`.
#[get("/about")]
pub async fn about(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let page = Page::About {
        chrome: chrome_for(&session, user.as_ref())?,
    };
    render_page(&state, &page)
}

/// `GET /contact`.
#[get("/contact")]
pub async fn contact(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let page = Page::Contact {
        chrome: chrome_for(&session, user.as_ref())?,
    };
    render_page(&state, &page)
}
