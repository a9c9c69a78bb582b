//! HTTP mapping for domain errors that are not flash-redirects.
//!
//! Handlers deal with the recoverable taxonomy themselves (flash plus
//! redirect); whatever reaches this type renders as a plain error page with
//! the appropriate status. Internal details are redacted from the body and
//! logged instead.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Result alias for HTTP handlers.
pub type PageResult<T> = Result<T, PageError>;

/// A domain error crossing the HTTP boundary as a rendered status page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError(Error);

impl PageError {
    /// The wrapped domain error.
    pub fn inner(&self) -> &Error {
        &self.0
    }
}

impl From<Error> for PageError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<actix_web::Error> for PageError {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak framework details to clients.
        error!(error = %err, "actix error promoted to page error");
        Self(Error::internal("internal server error"))
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PageError {}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidCredentials | ErrorCode::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::DuplicateEmail => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            "Something went wrong on our side."
        } else {
            self.0.message()
        };
        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(format!(
                "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
                 <title>{}</title></head><body><h1>{}</h1><p>{}</p>\
                 <p><a href=\"/\">Back to all posts</a></p></body></html>",
                status, status, message
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::validation("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::invalid_credentials(), StatusCode::UNAUTHORIZED)]
    #[case(Error::not_authorized("nope"), StatusCode::FORBIDDEN)]
    #[case(Error::duplicate_email(), StatusCode::CONFLICT)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(Error::service_unavailable("pool"), StatusCode::SERVICE_UNAVAILABLE)]
    fn status_matches_error_code(#[case] err: Error, #[case] expected: StatusCode) {
        assert_eq!(PageError::from(err).status_code(), expected);
    }

    #[actix_web::test]
    async fn server_errors_are_redacted() {
        let response = PageError::from(Error::internal("connection string leaked")).error_response();
        let bytes = actix_web::body::to_bytes(response.into_body())
            .await
            .expect("body readable");
        let text = String::from_utf8(bytes.to_vec()).expect("utf-8 body");
        assert!(!text.contains("connection string leaked"));
    }
}
