//! Argon2id implementation of the [`PasswordHasher`] port.

use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use rand::rngs::OsRng;

use crate::domain::PlainPassword;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes passwords with Argon2id using the crate's default parameters and
/// stores them as PHC strings.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Create a hasher with default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        argon2::PasswordHasher::hash_password(
            &self.argon2,
            password.expose().as_bytes(),
            &salt,
        )
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        stored_hash: &str,
    ) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hashing(err.to_string())),
        }
    }
}
