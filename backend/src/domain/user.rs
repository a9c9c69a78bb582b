//! User identity, roles, and the registration role-assignment rule.
//!
//! ## Invariants
//! - Exactly the first user ever created holds [`Role::RootUser`]; everyone
//!   registered afterwards starts as [`Role::Visitor`].
//! - [`Role::Admin`] is reachable only through an explicit promotion by an
//!   elevated actor, never at registration and never via [`Role::toggled`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Mint a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read back from the database.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its string form (session cookies).
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for user-supplied identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked the minimal `local@domain` shape.
    #[error("email must contain '@' with text either side")]
    MalformedEmail,
    /// Email exceeded the stored column width.
    #[error("email must be at most 100 characters")]
    EmailTooLong,
    /// Display name was empty after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// Display name exceeded the stored column width.
    #[error("name must be at most 100 characters")]
    NameTooLong,
}

/// A validated email address.
///
/// Comparison is byte-exact and case-sensitive, matching how addresses are
/// stored: `A@x.com` and `a@x.com` are distinct accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LEN: usize = 100;

    /// Validate a raw address.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(UserValidationError::EmailTooLong);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::MalformedEmail);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A validated display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LEN: usize = 100;

    /// Validate a raw display name.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(UserValidationError::NameTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Privilege tier attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The unique first-registered account; highest privilege.
    RootUser,
    /// Elevated role grantable and revocable by an elevated actor.
    Admin,
    /// Default authenticated role.
    Visitor,
}

impl Role {
    /// Role assigned at registration: the first user ever becomes the root
    /// admin, everyone afterwards a plain visitor.
    pub fn for_registration(existing_users: u64) -> Self {
        if existing_users == 0 {
            Self::RootUser
        } else {
            Self::Visitor
        }
    }

    /// Whether this role may access elevated pages.
    pub fn is_elevated(self) -> bool {
        matches!(self, Self::RootUser | Self::Admin)
    }

    /// The promotion/demotion toggle: Admin becomes Visitor and anything
    /// else becomes Admin. RootUser is excluded by the caller; the toggle
    /// itself never yields RootUser.
    pub fn toggled(self) -> Self {
        match self {
            Self::Admin => Self::Visitor,
            Self::RootUser | Self::Visitor => Self::Admin,
        }
    }

    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RootUser => "RootUser",
            Self::Admin => "Admin",
            Self::Visitor => "Visitor",
        }
    }

    /// Parse a storage label back into a role.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "RootUser" => Some(Self::RootUser),
            "Admin" => Some(Self::Admin),
            "Visitor" => Some(Self::Visitor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user.
///
/// Holds the password hash, never the plaintext; hashing happens behind the
/// `PasswordHasher` port before a `User` is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    password_hash: String,
    name: DisplayName,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user record from its parts.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        password_hash: String,
        name: DisplayName,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            name,
            role,
            created_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login email, unique across users.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored PHC password hash.
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Display name shown on posts and comments.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Current privilege tier.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("no-at-sign", UserValidationError::MalformedEmail)]
    #[case("@x.com", UserValidationError::MalformedEmail)]
    #[case("a@", UserValidationError::MalformedEmail)]
    fn rejects_malformed_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[test]
    fn emails_compare_case_sensitively() {
        let lower = EmailAddress::new("a@x.com").expect("valid email");
        let upper = EmailAddress::new("A@x.com").expect("valid email");
        assert_ne!(lower, upper);
    }

    #[test]
    fn email_is_trimmed_but_otherwise_preserved() {
        let email = EmailAddress::new("  Ada@x.com ").expect("valid email");
        assert_eq!(email.as_ref(), "Ada@x.com");
    }

    #[rstest]
    #[case("", UserValidationError::EmptyName)]
    #[case("  ", UserValidationError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(DisplayName::new(raw), Err(expected));
    }

    #[test]
    fn first_registration_becomes_root_admin() {
        assert_eq!(Role::for_registration(0), Role::RootUser);
        assert_eq!(Role::for_registration(1), Role::Visitor);
        assert_eq!(Role::for_registration(100), Role::Visitor);
    }

    #[test]
    fn toggle_flips_between_admin_and_visitor() {
        assert_eq!(Role::Admin.toggled(), Role::Visitor);
        assert_eq!(Role::Visitor.toggled(), Role::Admin);
        assert_eq!(Role::Visitor.toggled().toggled(), Role::Visitor);
    }

    #[test]
    fn toggle_never_yields_root() {
        for role in [Role::RootUser, Role::Admin, Role::Visitor] {
            assert_ne!(role.toggled(), Role::RootUser);
        }
    }

    #[rstest]
    #[case(Role::RootUser, true)]
    #[case(Role::Admin, true)]
    #[case(Role::Visitor, false)]
    fn elevation_covers_root_and_admin(#[case] role: Role, #[case] expected: bool) {
        assert_eq!(role.is_elevated(), expected);
    }

    #[test]
    fn role_labels_round_trip() {
        for role in [Role::RootUser, Role::Admin, Role::Visitor] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("Superuser"), None);
    }
}
