//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, ReferralCode, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the value being written.
        Duplicate { field: String } => "user repository duplicate value for {field}",
    }
}

/// Storage for [`User`] aggregates.
///
/// Email lookups are exact matches on the normalised address; [`Email`]
/// guarantees the lowercase form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    ///
    /// Returns [`UserPersistenceError::Duplicate`] naming the column when
    /// the email, Google id or referral code is already taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace the stored state of an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by linked Google subject identifier.
    async fn find_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Whether any account already holds `code`.
    async fn referral_code_exists(&self, code: &ReferralCode)
    -> Result<bool, UserPersistenceError>;
}
