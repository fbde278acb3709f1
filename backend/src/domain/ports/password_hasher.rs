//! Port for one-way password hashing.

use crate::domain::PlainPassword;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The hashing primitive failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hash and verify passwords.
///
/// Implementations are CPU bound and synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash of `password`.
    fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError>;

    /// Whether `password` matches `stored_hash`.
    fn verify(&self, password: &PlainPassword, stored_hash: &str)
    -> Result<bool, PasswordHashError>;
}

/// Reversible stand-in hasher for tests that do not exercise hashing.
///
/// Hashes are `hashed:` followed by the password.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError> {
        Ok(format!("hashed:{}", password.expose()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        stored_hash: &str,
    ) -> Result<bool, PasswordHashError> {
        let Some(expected) = stored_hash.strip_prefix("hashed:") else {
            return Err(PasswordHashError::malformed_hash("missing fixture prefix"));
        };
        Ok(expected == password.expose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixture_hasher_round_trips() {
        let hasher = FixturePasswordHasher;
        let password = PlainPassword::new("Analytical1");
        let hash = hasher.hash(&password).expect("hash");
        assert_eq!(hasher.verify(&password, &hash), Ok(true));
        assert_eq!(
            hasher.verify(&PlainPassword::new("wrong"), &hash),
            Ok(false)
        );
    }

    #[rstest]
    fn fixture_hasher_rejects_foreign_hashes() {
        let result = FixturePasswordHasher.verify(&PlainPassword::new("x"), "$argon2id$...");
        assert!(matches!(result, Err(PasswordHashError::MalformedHash { .. })));
    }
}
