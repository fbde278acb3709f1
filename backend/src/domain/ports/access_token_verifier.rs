//! Driving port resolving bearer access tokens to accounts.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Resolve the account behind an access token.
///
/// Failures carry the client-facing status and message: invalid or expired
/// tokens are unauthorized, non-user tokens and deleted accounts are
/// forbidden, and unknown subjects are not found.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    /// Verify `token` and load its subject.
    async fn authenticate(&self, token: &str) -> Result<User, Error>;
}
