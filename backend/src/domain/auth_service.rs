//! Password registration, login and token lifecycle service.
//!
//! Implements the [`AuthCommand`] driving port on top of the user repository,
//! the password hasher, the token codec and the revocation store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AuthCommand, LogoutRequest, PasswordHasher, TokenCodec, TokenRevocationStore, UserRepository,
};
use crate::domain::service_support::{
    allocate_referral_code, issue_session, map_password_hash_error, map_revocation_error,
    map_token_issue_error, map_user_persistence_error,
};
use crate::domain::{
    AccountStatus, ActivityEntry, ActivityKind, AuthSession, ClientContext, Error,
    LoginCredentials, NewAccount, RefreshedAccess, RegistrationReceipt, RegistrationRequest,
    TokenClaims, TokenKind, User, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
const ACCOUNT_UNAVAILABLE: &str = "Account not found or inactive";

/// Account authentication service.
#[derive(Clone)]
pub struct AuthService<R, S> {
    users: Arc<R>,
    revocations: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl<R, S> AuthService<R, S> {
    /// Create the service from its collaborators.
    pub fn new(
        users: Arc<R>,
        revocations: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            revocations,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<R, S> AuthService<R, S>
where
    R: UserRepository,
    S: TokenRevocationStore,
{
    fn check_status(user: &User) -> Result<(), Error> {
        if user.is_deleted {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        match user.status {
            AccountStatus::Suspended => Err(Error::unauthorized("Your account has been suspended")),
            AccountStatus::Disabled => Err(Error::unauthorized("Your account has been disabled")),
            _ => Ok(()),
        }
    }

    async fn verified_refresh_claims(&self, token: &str) -> Result<TokenClaims, Error> {
        let claims = self
            .tokens
            .decode(token)
            .map_err(|_| Error::unauthorized(INVALID_REFRESH_TOKEN))?;
        if claims.kind != TokenKind::Refresh || !claims.is_user_token() {
            return Err(Error::unauthorized(INVALID_REFRESH_TOKEN));
        }
        let revoked = self
            .revocations
            .is_revoked(claims.jti)
            .await
            .map_err(map_revocation_error)?;
        if revoked {
            return Err(Error::unauthorized(INVALID_REFRESH_TOKEN));
        }
        Ok(claims)
    }

    async fn revoke_refresh_token(&self, token: &str) {
        let claims = match self.tokens.decode(token) {
            Ok(claims) if claims.kind == TokenKind::Refresh => claims,
            Ok(_) | Err(_) => {
                info!("logout presented an unusable refresh token");
                return;
            }
        };
        if let Err(error) = self
            .revocations
            .revoke(claims.jti, claims.expires_at())
            .await
        {
            warn!(%error, "failed to revoke refresh token at logout");
        }
    }

    async fn record_logout(&self, token: &str, client: &ClientContext) {
        let user_id = match self.tokens.decode(token) {
            Ok(claims) if claims.kind == TokenKind::Access => UserId::new(&claims.sub),
            Ok(_) | Err(_) => return,
        };
        let Ok(user_id) = user_id else {
            return;
        };
        let mut user = match self.users.find_by_id(&user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(error) => {
                warn!(%error, "failed to load user for logout activity");
                return;
            }
        };
        let now = self.clock.utc();
        user.record_activity(ActivityEntry::new(
            ActivityKind::Logout,
            "User logged out",
            client,
            now,
        ));
        user.updated_at = now;
        if let Err(error) = self.users.update(&user).await {
            warn!(%error, user_id = %user.id, "failed to record logout activity");
        }
    }
}

#[async_trait]
impl<R, S> AuthCommand for AuthService<R, S>
where
    R: UserRepository,
    S: TokenRevocationStore,
{
    async fn register(
        &self,
        request: RegistrationRequest,
        client: ClientContext,
    ) -> Result<RegistrationReceipt, Error> {
        let existing = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict("Email already registered"));
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(map_password_hash_error)?;
        let referral_code = allocate_referral_code(self.users.as_ref()).await?;
        let now = self.clock.utc();
        let mut user = User::register(
            NewAccount {
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
            },
            referral_code,
            now,
        );
        user.record_activity(ActivityEntry::new(
            ActivityKind::Register,
            "Account registered",
            &client,
            now,
        ));
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %user.id, "account registered");
        Ok(RegistrationReceipt {
            user_id: user.id,
            email: user.email,
            referral_code: user.referral_code,
        })
    }

    async fn login(
        &self,
        credentials: LoginCredentials,
        client: ClientContext,
    ) -> Result<AuthSession, Error> {
        let Some(mut user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = match self
            .hasher
            .verify(credentials.password(), &user.password_hash)
        {
            Ok(matches) => matches,
            Err(error) => {
                warn!(%error, user_id = %user.id, "stored password hash unusable");
                false
            }
        };
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Self::check_status(&user)?;

        let now = self.clock.utc();
        user.record_login(now);
        user.record_activity(ActivityEntry::new(
            ActivityKind::Login,
            "User logged in",
            &client,
            now,
        ));
        self.users
            .update(&user)
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %user.id, "user logged in");
        issue_session(self.tokens.as_ref(), user)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess, Error> {
        let claims = self.verified_refresh_claims(refresh_token).await?;
        let user_id =
            UserId::new(&claims.sub).map_err(|_| Error::unauthorized(INVALID_REFRESH_TOKEN))?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_persistence_error)?
            .filter(User::can_refresh)
            .ok_or_else(|| Error::unauthorized(ACCOUNT_UNAVAILABLE))?;

        let access = self
            .tokens
            .issue(&user.id, TokenKind::Access)
            .map_err(map_token_issue_error)?;
        Ok(RefreshedAccess {
            access_token: access.token,
            expires_in: self.tokens.lifetime(TokenKind::Access).num_seconds(),
        })
    }

    async fn logout(&self, request: LogoutRequest, client: ClientContext) -> Result<(), Error> {
        if let Some(token) = request.refresh_token.as_deref() {
            self.revoke_refresh_token(token).await;
        }
        if let Some(token) = request.access_token.as_deref() {
            self.record_logout(token, &client).await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
