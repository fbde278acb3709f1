//! Helpers shared by the account services.

use tracing::{debug, warn};

use crate::domain::ports::{
    PasswordHashError, TokenCodec, TokenCodecError, TokenRevocationError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{AuthSession, Error, ReferralCode, TokenKind, User};

/// Attempts made to find an unused referral code before giving up.
pub(crate) const REFERRAL_CODE_ATTEMPTS: usize = 5;

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(%message, "user repository unavailable");
            Error::service_unavailable("User store is temporarily unavailable")
        }
        UserPersistenceError::Query { message } => {
            warn!(%message, "user repository query failed");
            Error::internal(message)
        }
        UserPersistenceError::Duplicate { field } if field == "email" => {
            Error::conflict("Email already registered")
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("{field} is already in use"))
        }
    }
}

pub(crate) fn map_revocation_error(error: TokenRevocationError) -> Error {
    match error {
        TokenRevocationError::Connection { message } => {
            warn!(%message, "token revocation store unavailable");
            Error::service_unavailable("Token store is temporarily unavailable")
        }
        TokenRevocationError::Query { message } => Error::internal(message),
    }
}

pub(crate) fn map_password_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_token_issue_error(error: TokenCodecError) -> Error {
    Error::internal(error.to_string())
}

/// Draw referral codes until one is unused.
pub(crate) async fn allocate_referral_code<R>(users: &R) -> Result<ReferralCode, Error>
where
    R: UserRepository + ?Sized,
{
    for attempt in 1..=REFERRAL_CODE_ATTEMPTS {
        let candidate = ReferralCode::generate(&mut rand::thread_rng());
        let taken = users
            .referral_code_exists(&candidate)
            .await
            .map_err(map_user_persistence_error)?;
        if !taken {
            return Ok(candidate);
        }
        debug!(attempt, "referral code collision");
    }
    Err(Error::internal(format!(
        "no unused referral code after {REFERRAL_CODE_ATTEMPTS} attempts"
    )))
}

/// Issue an access/refresh token pair for `user`.
pub(crate) fn issue_session(tokens: &dyn TokenCodec, user: User) -> Result<AuthSession, Error> {
    let access = tokens
        .issue(&user.id, TokenKind::Access)
        .map_err(map_token_issue_error)?;
    let refresh = tokens
        .issue(&user.id, TokenKind::Refresh)
        .map_err(map_token_issue_error)?;
    Ok(AuthSession {
        access_token: access.token,
        refresh_token: refresh.token,
        expires_in: tokens.lifetime(TokenKind::Access).num_seconds(),
        user,
    })
}
