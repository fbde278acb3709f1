//! HS256 JWT implementation of the [`TokenCodec`] port.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_REFRESH_TOKEN_DAYS, IssuedToken, TokenClaims, TokenKind,
    UserId,
};

/// Lifetimes applied to freshly issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh: Duration::days(DEFAULT_REFRESH_TOKEN_DAYS),
        }
    }
}

/// Signs and verifies tokens with a shared HMAC secret.
///
/// Expiry is checked against the injected clock rather than the system
/// time, with no leeway: a token is accepted up to and including the
/// second named by `exp`.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetimes: TokenLifetimes,
    clock: Arc<dyn Clock>,
}

impl JwtTokenCodec {
    /// Build a codec from raw secret bytes.
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetimes,
            clock,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user: &UserId, kind: TokenKind) -> Result<IssuedToken, TokenCodecError> {
        let issued_at = self.clock.utc();
        let claims = TokenClaims::for_user(user, kind, issued_at, issued_at + self.lifetime(kind));
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenCodecError::encoding(err.to_string()))?;
        Ok(IssuedToken { token, claims })
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            TokenCodecError::invalid(err.to_string())
        })?;
        if data.claims.exp < self.clock.utc().timestamp() {
            return Err(TokenCodecError::expired());
        }
        Ok(data.claims)
    }

    fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.lifetimes.access,
            TokenKind::Refresh => self.lifetimes.refresh,
        }
    }
}
