//! Port for remembering refresh tokens revoked at logout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::define_port_error;

define_port_error! {
    /// Errors raised by revocation store adapters.
    pub enum TokenRevocationError {
        /// Store connection could not be established.
        Connection { message: String } => "revocation store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "revocation store query failed: {message}",
    }
}

/// Deny-list of token identifiers (`jti`).
///
/// Entries only need to outlive the token they revoke; adapters may drop
/// them once `expires_at` has passed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRevocationStore: Send + Sync {
    /// Revoke `jti` until `expires_at`. Revoking twice is not an error.
    async fn revoke(&self, jti: Uuid, expires_at: DateTime<Utc>)
    -> Result<(), TokenRevocationError>;

    /// Whether `jti` has been revoked.
    async fn is_revoked(&self, jti: Uuid) -> Result<bool, TokenRevocationError>;
}
