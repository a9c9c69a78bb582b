//! Registration, login, and logout handlers.
//!
//! Login implements the elevation-hint state machine: a `next=/admin`
//! parameter survives the round trip through the form, and submitting valid
//! credentials under it still refuses the admin area unless the
//! authenticated role is elevated.

use actix_web::{get, post, web, HttpResponse};

use crate::domain::access::{decide_login, LoginDecision, LoginIntent, ELEVATION_REQUIRED};
use crate::domain::ports::{AuthFormView, Flash, Page};
use crate::domain::{DisplayName, EmailAddress, ErrorCode, LoginCredentials, Password};

use super::forms::{LoginForm, NextQuery, RegisterForm};
use super::{
    chrome_for, current_user, flash_and_redirect, redirect_to, render_page, HttpState, PageResult,
    SessionContext,
};

/// `GET /register`: the registration form.
#[get("/register")]
pub async fn register_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let page = Page::Register {
        chrome: chrome_for(&session, user.as_ref())?,
        form: AuthFormView::default(),
    };
    render_page(&state, &page)
}

/// `POST /register`: create the account, sign it in, and go home.
///
/// The first account ever created becomes the root admin. A taken email
/// flashes and forwards to the login form instead.
#[post("/register")]
pub async fn register_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> PageResult<HttpResponse> {
    let parsed = EmailAddress::new(&form.email)
        .map_err(|err| err.to_string())
        .and_then(|email| {
            let password = Password::new(&form.password).map_err(|err| err.to_string())?;
            let name = DisplayName::new(&form.name).map_err(|err| err.to_string())?;
            Ok((email, password, name))
        });

    let (email, password, name) = match parsed {
        Ok(parts) => parts,
        Err(message) => {
            // Re-render the form with the rejected values still filled in.
            let page = Page::Register {
                chrome: validation_chrome(&session, &message)?,
                form: AuthFormView {
                    email: form.email.clone(),
                    name: form.name.clone(),
                },
            };
            return render_page(&state, &page);
        }
    };

    match state.identity.register(email, &password, name).await {
        Ok(user) => {
            session.persist_user(user.id())?;
            Ok(redirect_to("/"))
        }
        Err(err) if err.code() == ErrorCode::DuplicateEmail => flash_and_redirect(&session, &err),
        Err(err) => Err(err.into()),
    }
}

/// `GET /login`: the login form, carrying any `next` target.
#[get("/login")]
pub async fn login_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NextQuery>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let page = Page::Login {
        chrome: chrome_for(&session, user.as_ref())?,
        form: AuthFormView::default(),
        next: query.into_inner().next,
    };
    render_page(&state, &page)
}

/// `POST /login`: authenticate and route per the login state machine.
#[post("/login")]
pub async fn login_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> PageResult<HttpResponse> {
    let next = query.into_inner().next;

    let credentials = match LoginCredentials::try_from_parts(&form.email, &form.password) {
        Ok(credentials) => credentials,
        Err(err) => {
            let page = Page::Login {
                chrome: validation_chrome(&session, &err.to_string())?,
                form: AuthFormView {
                    email: form.email.clone(),
                    name: String::new(),
                },
                next,
            };
            return render_page(&state, &page);
        }
    };

    let user = match state.auth.authenticate(&credentials).await {
        Ok(user) => user,
        Err(err) if err.code() == ErrorCode::InvalidCredentials => {
            // Stay on the form: visible error, credentials re-entry.
            let page = Page::Login {
                chrome: validation_chrome(&session, err.message())?,
                form: AuthFormView {
                    email: form.email.clone(),
                    name: String::new(),
                },
                next,
            };
            return render_page(&state, &page);
        }
        Err(err) => return Err(err.into()),
    };

    let intent = LoginIntent::from_next(next.as_deref());
    match decide_login(&user, &intent) {
        LoginDecision::Granted { redirect } => {
            session.persist_user(user.id())?;
            Ok(redirect_to(&redirect))
        }
        LoginDecision::ElevationRefused { redirect } => {
            // The credentials were right, so the session stands; only the
            // elevated page is refused.
            session.persist_user(user.id())?;
            session.push_flash(Flash::error(ELEVATION_REQUIRED))?;
            Ok(redirect_to(&redirect))
        }
    }
}

/// `GET /logout`: destroy the session and go home.
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect_to("/")
}

/// Chrome for an immediate form re-render: pending flashes plus the
/// validation message, without touching the session store.
fn validation_chrome(
    session: &SessionContext,
    message: &str,
) -> PageResult<crate::domain::ports::PageChrome> {
    let mut chrome = chrome_for(session, None)?;
    chrome.flashes.push(Flash::error(message));
    Ok(chrome)
}
