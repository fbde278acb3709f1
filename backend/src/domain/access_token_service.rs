//! Resolves bearer access tokens to user accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{AccessTokenVerifier, TokenCodec, UserRepository};
use crate::domain::service_support::map_user_persistence_error;
use crate::domain::{Error, TokenKind, User, UserId};

const INVALID_TOKEN: &str = "Invalid or expired token";

/// [`AccessTokenVerifier`] backed by the token codec and user repository.
#[derive(Clone)]
pub struct AccessTokenService<R> {
    users: Arc<R>,
    tokens: Arc<dyn TokenCodec>,
}

impl<R> AccessTokenService<R> {
    /// Create the verifier.
    pub fn new(users: Arc<R>, tokens: Arc<dyn TokenCodec>) -> Self {
        Self { users, tokens }
    }
}

#[async_trait]
impl<R> AccessTokenVerifier for AccessTokenService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let claims = self.tokens.decode(token).map_err(|error| {
            debug!(%error, "bearer token rejected");
            Error::unauthorized(INVALID_TOKEN)
        })?;
        if claims.kind != TokenKind::Access {
            return Err(Error::unauthorized(INVALID_TOKEN));
        }
        if !claims.is_user_token() {
            return Err(Error::forbidden("User access required"));
        }
        let user_id = UserId::new(&claims.sub).map_err(|_| Error::unauthorized(INVALID_TOKEN))?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        if user.is_deleted {
            return Err(Error::forbidden("Account has been deleted"));
        }
        Ok(user)
    }
}
