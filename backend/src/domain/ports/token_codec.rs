//! Port for signing and decoding bearer tokens.

use chrono::Duration;

use crate::domain::{IssuedToken, TokenClaims, TokenKind, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codec adapters.
    pub enum TokenCodecError {
        /// Claims could not be signed.
        Encoding { message: String } => "token encoding failed: {message}",
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token verified but its expiry has passed.
        Expired => "token has expired",
    }
}

/// Issue and verify signed tokens.
///
/// Implementations own the signing key, the lifetimes of each
/// [`TokenKind`] and the clock used for expiry.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a fresh token of `kind` for `user`.
    fn issue(&self, user: &UserId, kind: TokenKind) -> Result<IssuedToken, TokenCodecError>;

    /// Verify the signature and expiry of `token` and return its claims.
    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError>;

    /// Lifetime of tokens of `kind`.
    fn lifetime(&self, kind: TokenKind) -> Duration;
}
