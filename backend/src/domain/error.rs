//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps the
//! user-recoverable codes to flash-message redirects and the remainder to
//! rendered error pages; nothing in this module knows about HTTP.

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Registration attempted with an email that is already taken.
    DuplicateEmail,
    /// Login failed; deliberately silent about which credential was wrong.
    InvalidCredentials,
    /// The action requires a signed-in user.
    NotAuthenticated,
    /// The action requires an elevated (Admin or RootUser) role.
    NotAuthorized,
    /// The referenced post or user does not exist.
    NotFound,
    /// Form input failed validation.
    Validation,
    /// An unexpected fault inside the domain or an adapter.
    Internal,
    /// A dependency (the database pool) is temporarily unavailable.
    ServiceUnavailable,
}

/// Domain error payload.
///
/// Guard failures carry a `redirect` hint: the path the user should be sent
/// to so they can recover (typically `/login` with a `next` target). The
/// hint is advice to the inbound adapter, not an instruction the domain
/// acts on itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    redirect: Option<String>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            redirect: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message shown to the user.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Recovery path the inbound adapter should redirect to, if any.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Attach a recovery redirect hint.
    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::DuplicateEmail`].
    pub fn duplicate_email() -> Self {
        Self::new(
            ErrorCode::DuplicateEmail,
            "You've already registered with that email. Log in instead!",
        )
        .with_redirect("/login")
    }

    /// Convenience constructor for [`ErrorCode::InvalidCredentials`].
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorCode::InvalidCredentials,
            "Incorrect credentials. Please try again.",
        )
    }

    /// Convenience constructor for [`ErrorCode::NotAuthenticated`].
    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotAuthenticated, message)
    }

    /// Convenience constructor for [`ErrorCode::NotAuthorized`].
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotAuthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_codes() {
        assert_eq!(Error::duplicate_email().code(), ErrorCode::DuplicateEmail);
        assert_eq!(
            Error::invalid_credentials().code(),
            ErrorCode::InvalidCredentials
        );
        assert_eq!(
            Error::not_authenticated("login required").code(),
            ErrorCode::NotAuthenticated
        );
        assert_eq!(
            Error::not_authorized("admin required").code(),
            ErrorCode::NotAuthorized
        );
        assert_eq!(Error::not_found("missing").code(), ErrorCode::NotFound);
        assert_eq!(Error::validation("bad input").code(), ErrorCode::Validation);
        assert_eq!(Error::internal("boom").code(), ErrorCode::Internal);
        assert_eq!(
            Error::service_unavailable("pool exhausted").code(),
            ErrorCode::ServiceUnavailable
        );
    }

    #[test]
    fn duplicate_email_carries_login_redirect() {
        let err = Error::duplicate_email();
        assert_eq!(err.redirect(), Some("/login"));
    }

    #[test]
    fn redirect_hint_is_preserved() {
        let err = Error::not_authenticated("login required").with_redirect("/login?next=%2Fadmin");
        assert_eq!(err.redirect(), Some("/login?next=%2Fadmin"));
        assert_eq!(err.to_string(), "login required");
    }
}
