//! Argon2 credential store adapter.
//!
//! Produces salted PHC-format hashes and verifies candidates against them.
//! Verification parses the stored string for its own salt and parameters,
//! so the comparison costs the same effort regardless of which part
//! mismatches. A malformed stored hash verifies as false rather than
//! erroring; login treats it like any wrong password.

use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use password_hash::{PasswordHash, SaltString};

use crate::domain::credentials::Password;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id-backed implementation of the `PasswordHasher` port.
pub struct Argon2PasswordHasher {
    dummy_hash: String,
}

impl Argon2PasswordHasher {
    /// Create the adapter, pre-computing the dummy hash used to equalize
    /// the unknown-email login path.
    pub fn new() -> Result<Self, PasswordHashError> {
        let dummy_hash = hash_password("decoy-password-for-unknown-accounts")?;
        Ok(Self { dummy_hash })
    }
}

fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|err| PasswordHashError::hash(err.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| PasswordHashError::hash(err.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| PasswordHashError::hash(err.to_string()))?
        .to_string();
    Ok(phc)
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        hash_password(password.expose())
    }

    fn verify(&self, password: &Password, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok()
    }

    fn dummy_hash(&self) -> &str {
        self.dummy_hash.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("valid password")
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = Argon2PasswordHasher::new().expect("hasher builds");
        let phc = hasher.hash(&password("hunter2")).expect("hashing succeeds");

        assert!(hasher.verify(&password("hunter2"), &phc));
        assert!(!hasher.verify(&password("wrong"), &phc));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2PasswordHasher::new().expect("hasher builds");
        let first = hasher.hash(&password("hunter2")).expect("hashing succeeds");
        let second = hasher.hash(&password("hunter2")).expect("hashing succeeds");
        assert_ne!(first, second);
    }

    #[test]
    fn plaintext_never_appears_in_the_hash() {
        let hasher = Argon2PasswordHasher::new().expect("hasher builds");
        let phc = hasher.hash(&password("hunter2")).expect("hashing succeeds");
        assert!(!phc.contains("hunter2"));
    }

    #[test]
    fn malformed_stored_hash_verifies_false() {
        let hasher = Argon2PasswordHasher::new().expect("hasher builds");
        assert!(!hasher.verify(&password("hunter2"), "not-a-phc-string"));
    }

    #[test]
    fn dummy_hash_is_well_formed() {
        let hasher = Argon2PasswordHasher::new().expect("hasher builds");
        assert!(PasswordHash::new(hasher.dummy_hash()).is_ok());
    }
}
