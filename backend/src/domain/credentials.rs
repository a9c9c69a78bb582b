//! Login and registration credential value types.
//!
//! A raw password exists only inside [`Password`]; it is handed to the
//! `PasswordHasher` port and never stored, logged, or serialized. The type
//! deliberately derives neither `Serialize` nor `Debug`-with-content.

use super::user::{EmailAddress, UserValidationError};

/// Validation errors for credential input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// The email field failed validation.
    #[error(transparent)]
    Email(#[from] UserValidationError),
    /// The password field was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// A non-empty raw password, pending hashing or verification.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validate raw password input.
    pub fn new(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Expose the raw secret to the hashing boundary.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// A validated email/password pair submitted on the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Validate the raw form fields into credentials.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }

    /// The email to look up.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The password to verify.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(
            LoginCredentials::try_from_parts("a@x.com", ""),
            Err(CredentialValidationError::EmptyPassword)
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        assert!(matches!(
            LoginCredentials::try_from_parts("not-an-email", "pw"),
            Err(CredentialValidationError::Email(_))
        ));
    }

    #[test]
    fn password_debug_never_prints_the_secret() {
        let password = Password::new("hunter2").expect("valid password");
        let rendered = format!("{password:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
