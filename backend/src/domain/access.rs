//! Access Control Guard: capability checks and the login-flow state machine.
//!
//! Handlers invoke these checks explicitly at their top; there is no
//! decorator layer and no ambient current-user global. A failed check
//! returns a tagged error carrying the redirect the HTTP adapter should
//! issue, with the originally requested path preserved so login can
//! forward there afterwards.

use super::error::Error;
use super::user::User;

/// Message shown when a page needs an elevated role.
pub const ELEVATION_REQUIRED: &str =
    "Elevated access is required for this page. Please log in as an admin";

/// Path of the elevated area; doubles as the elevation hint value.
pub const ADMIN_PATH: &str = "/admin";

/// Build the login redirect that remembers the originally requested path.
pub fn login_redirect(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}

/// Require a signed-in user.
///
/// `requested_path` is preserved in the failure redirect so the login flow
/// can forward there once credentials check out.
pub fn require_authenticated<'a>(
    user: Option<&'a User>,
    requested_path: &str,
) -> Result<&'a User, Error> {
    user.ok_or_else(|| {
        Error::not_authenticated("Please log in to continue")
            .with_redirect(login_redirect(requested_path))
    })
}

/// Require a signed-in user holding an elevated role.
///
/// The failure redirect carries the elevation hint: login must re-check the
/// role before granting the admin area.
pub fn require_elevated(user: Option<&User>) -> Result<&User, Error> {
    match user {
        Some(user) if user.role().is_elevated() => Ok(user),
        _ => Err(Error::not_authorized(ELEVATION_REQUIRED).with_redirect(login_redirect(ADMIN_PATH))),
    }
}

/// What the submitted login form is trying to reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIntent {
    /// An ordinary login, optionally forwarding to a remembered path.
    Plain {
        /// Sanitized forwarding target, if one was carried.
        next: Option<String>,
    },
    /// The elevation hint is active: the user wanted the admin area.
    Elevated,
}

impl LoginIntent {
    /// Interpret the `next` query parameter carried through the login form.
    ///
    /// Only site-local paths are honoured; anything not starting with a
    /// single `/` is dropped so the login flow cannot be turned into an
    /// open redirect.
    pub fn from_next(next: Option<&str>) -> Self {
        match next {
            Some(ADMIN_PATH) => Self::Elevated,
            Some(path) if path.starts_with('/') && !path.starts_with("//") => Self::Plain {
                next: Some(path.to_owned()),
            },
            _ => Self::Plain { next: None },
        }
    }
}

/// Outcome of submitting valid credentials.
///
/// Invalid credentials never reach this decision; `AuthService` rejects
/// them first and the flow stays on the login form with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginDecision {
    /// Session established; send the user on.
    Granted {
        /// Where to forward: the remembered path, the admin area, or home.
        redirect: String,
    },
    /// Credentials were valid but the elevation hint requires a role the
    /// user does not hold. The session is still established (the user did
    /// authenticate); only the elevated page is refused.
    ElevationRefused {
        /// Back to the login form, hint intact, so the error is visible.
        redirect: String,
    },
}

/// The login-flow state machine, as a pure decision over an authenticated
/// user and the carried intent.
pub fn decide_login(user: &User, intent: &LoginIntent) -> LoginDecision {
    match intent {
        LoginIntent::Elevated => {
            if user.role().is_elevated() {
                LoginDecision::Granted {
                    redirect: ADMIN_PATH.to_owned(),
                }
            } else {
                LoginDecision::ElevationRefused {
                    redirect: login_redirect(ADMIN_PATH),
                }
            }
        }
        LoginIntent::Plain { next } => LoginDecision::Granted {
            redirect: next.clone().unwrap_or_else(|| "/".to_owned()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{DisplayName, EmailAddress, Role, UserId};
    use crate::domain::ErrorCode;
    use chrono::Utc;
    use rstest::rstest;

    fn user_with_role(role: Role) -> User {
        User::new(
            UserId::new_random(),
            EmailAddress::new("u@x.com").expect("valid email"),
            "phc-hash".to_owned(),
            DisplayName::new("U").expect("valid name"),
            role,
            Utc::now(),
        )
    }

    #[test]
    fn unauthenticated_request_is_redirected_to_login_with_next() {
        let err = require_authenticated(None, "/post/42").expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotAuthenticated);
        assert_eq!(err.redirect(), Some("/login?next=%2Fpost%2F42"));
    }

    #[test]
    fn authenticated_request_passes_through() {
        let user = user_with_role(Role::Visitor);
        let granted = require_authenticated(Some(&user), "/post/42").expect("must pass");
        assert_eq!(granted.id(), user.id());
    }

    #[rstest]
    #[case(Role::RootUser)]
    #[case(Role::Admin)]
    fn elevated_roles_pass_the_elevation_check(#[case] role: Role) {
        let user = user_with_role(role);
        assert!(require_elevated(Some(&user)).is_ok());
    }

    #[test]
    fn visitors_and_anonymous_fail_the_elevation_check() {
        let visitor = user_with_role(Role::Visitor);
        for user in [None, Some(&visitor)] {
            let err = require_elevated(user).expect_err("must fail");
            assert_eq!(err.code(), ErrorCode::NotAuthorized);
            assert_eq!(err.redirect(), Some("/login?next=%2Fadmin"));
            assert_eq!(err.message(), ELEVATION_REQUIRED);
        }
    }

    #[rstest]
    #[case(Some("/admin"), LoginIntent::Elevated)]
    #[case(Some("/post/7"), LoginIntent::Plain { next: Some("/post/7".to_owned()) })]
    #[case(Some("https://evil.example/"), LoginIntent::Plain { next: None })]
    #[case(Some("//evil.example/"), LoginIntent::Plain { next: None })]
    #[case(None, LoginIntent::Plain { next: None })]
    fn next_parameter_maps_to_intent(#[case] next: Option<&str>, #[case] expected: LoginIntent) {
        assert_eq!(LoginIntent::from_next(next), expected);
    }

    #[test]
    fn plain_login_forwards_to_remembered_path_or_home() {
        let visitor = user_with_role(Role::Visitor);
        assert_eq!(
            decide_login(&visitor, &LoginIntent::Plain { next: Some("/post/7".to_owned()) }),
            LoginDecision::Granted { redirect: "/post/7".to_owned() }
        );
        assert_eq!(
            decide_login(&visitor, &LoginIntent::Plain { next: None }),
            LoginDecision::Granted { redirect: "/".to_owned() }
        );
    }

    #[test]
    fn elevated_intent_admits_elevated_roles() {
        for role in [Role::RootUser, Role::Admin] {
            let user = user_with_role(role);
            assert_eq!(
                decide_login(&user, &LoginIntent::Elevated),
                LoginDecision::Granted { redirect: "/admin".to_owned() }
            );
        }
    }

    #[test]
    fn elevated_intent_refuses_visitors_without_dropping_the_hint() {
        let visitor = user_with_role(Role::Visitor);
        assert_eq!(
            decide_login(&visitor, &LoginIntent::Elevated),
            LoginDecision::ElevationRefused {
                redirect: "/login?next=%2Fadmin".to_owned()
            }
        );
    }
}
