//! Elevated administration handlers: user listing and role toggling.

use actix_web::{get, post, web, HttpResponse};
use pagination::PageNumber;

use crate::domain::access::require_elevated;
use crate::domain::ports::{Flash, Page, UserRowView};
use crate::domain::identity::map_user_persistence_error;
use crate::domain::{ErrorCode, Role, UserId};

use super::forms::{PageQuery, UserIdQuery};
use super::{
    chrome_for, current_user, flash_and_redirect, redirect_to, render_not_found, render_page,
    HttpState, PageResult, SessionContext,
};

/// Users shown per admin listing page.
const USERS_PER_PAGE: u32 = 5;

/// `GET /admin?page=N`: paginated user listing; elevated only.
#[get("/admin")]
pub async fn admin_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let user = match require_elevated(user.as_ref()) {
        Ok(user) => user,
        Err(err) => return flash_and_redirect(&session, &err),
    };

    let page_number = PageNumber::from_query(query.into_inner().page);
    let users = state
        .users
        .list_page(page_number, USERS_PER_PAGE)
        .await
        .map_err(map_user_persistence_error)?;

    let rows = users.map(|listed| UserRowView {
        id: listed.id().to_string(),
        email: listed.email().as_ref().to_owned(),
        name: listed.name().as_ref().to_owned(),
        role: listed.role().to_string(),
        can_toggle: listed.role() != Role::RootUser,
    });

    let page = Page::AdminUsers {
        chrome: chrome_for(&session, Some(user))?,
        users: rows,
    };
    render_page(&state, &page)
}

/// `POST /change_role?user_id=ID`: toggle Admin ↔ Visitor; elevated only.
#[post("/change_role")]
pub async fn change_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UserIdQuery>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let actor = match require_elevated(user.as_ref()) {
        Ok(user) => user,
        Err(err) => return flash_and_redirect(&session, &err),
    };

    let Ok(subject) = UserId::parse(&query.user_id) else {
        return render_not_found(&state, chrome_for(&session, Some(actor))?);
    };

    match state.identity.toggle_role(subject).await {
        Ok(role) => {
            session.push_flash(Flash::info(format!("Role changed to {role}.")))?;
            Ok(redirect_to("/admin"))
        }
        Err(err) if err.code() == ErrorCode::NotFound => {
            render_not_found(&state, chrome_for(&session, Some(actor))?)
        }
        Err(err) if err.code() == ErrorCode::Validation => {
            session.push_flash(Flash::error(err.message()))?;
            Ok(redirect_to("/admin"))
        }
        Err(err) => Err(err.into()),
    }
}
