//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers deal only in domain-friendly
//! operations: persisting or resolving the signed-in user and queueing
//! one-shot flash messages. Handlers receive the context read-only; no
//! handler can reach another user's session.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::Flash;
use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASHES_KEY: &str = "flashes";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A tampered or stale id is treated as signed out rather than an
    /// error; the cookie signature already guards integrity.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))?;
        match raw {
            Some(raw) => match UserId::parse(&raw) {
                Ok(id) => Ok(Some(id)),
                Err(err) => {
                    tracing::warn!("invalid user id in session cookie: {err}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Sign the user out. Idempotent: clearing an empty session is a no-op.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Queue a flash message for the next rendered page.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut pending = self.pending_flashes()?;
        pending.push(flash);
        self.0
            .insert(FLASHES_KEY, pending)
            .map_err(|err| Error::internal(format!("failed to store flash: {err}")))
    }

    /// Drain queued flash messages for rendering.
    pub fn take_flashes(&self) -> Result<Vec<Flash>, Error> {
        let pending = self.pending_flashes()?;
        if !pending.is_empty() {
            self.0.remove(FLASHES_KEY);
        }
        Ok(pending)
    }

    fn pending_flashes(&self) -> Result<Vec<Flash>, Error> {
        Ok(self
            .0
            .get::<Vec<Flash>>(FLASHES_KEY)
            .map_err(|err| Error::internal(format!("failed to read flashes: {err}")))?
            .unwrap_or_default())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    use crate::inbound::http::test_utils::test_session_middleware;

    fn session_cookie(
        res: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id = UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                            .expect("fixture id");
                        session.persist_user(id)?;
                        Ok::<_, crate::inbound::http::PageError>(HttpResponse::Ok().finish())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id()?;
                        Ok::<_, crate::inbound::http::PageError>(
                            HttpResponse::Ok().body(id.map(|i| i.to_string()).unwrap_or_default()),
                        )
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[actix_web::test]
    async fn flashes_drain_once() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/flash",
                    web::get().to(|session: SessionContext| async move {
                        session.push_flash(Flash::error("oops"))?;
                        Ok::<_, crate::inbound::http::PageError>(HttpResponse::Ok().finish())
                    }),
                )
                .route(
                    "/drain",
                    web::get().to(|session: SessionContext| async move {
                        let flashes = session.take_flashes()?;
                        Ok::<_, crate::inbound::http::PageError>(
                            HttpResponse::Ok().body(format!("{}", flashes.len())),
                        )
                    }),
                ),
        )
        .await;

        let flash_res =
            test::call_service(&app, test::TestRequest::get().uri("/flash").to_request()).await;
        let cookie = session_cookie(&flash_res);

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/drain")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        // Draining clears the session state carried in the response cookie.
        let drained_cookie = session_cookie(&first);
        assert_eq!(test::read_body(first).await, "1");

        let second = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/drain")
                .cookie(drained_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(second).await, "0");
    }

    #[actix_web::test]
    async fn tampered_user_id_reads_as_signed_out() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: actix_session::Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok().finish()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id()?;
                        Ok::<_, crate::inbound::http::PageError>(
                            HttpResponse::Ok().body(format!("{}", id.is_some())),
                        )
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "false");
    }
}
