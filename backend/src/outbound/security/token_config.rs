//! Bearer token configuration parsing and validation.
//!
//! The signing secret and token lifetimes come from the environment so they
//! can be validated consistently and tested in isolation with
//! `mockable::MockEnv`.

pub mod fingerprint;

use std::path::PathBuf;

use chrono::Duration;
use mockable::Env;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::jwt_token_codec::TokenLifetimes;
use fingerprint::secret_fingerprint;

const SECRET_FILE_ENV: &str = "JWT_SECRET_KEY_FILE";
const SECRET_ENV: &str = "JWT_SECRET_KEY";
const ACCESS_MINUTES_ENV: &str = "ACCESS_TOKEN_EXPIRE_MINUTES";
const REFRESH_DAYS_ENV: &str = "REFRESH_TOKEN_EXPIRE_DAYS";
const POSITIVE_INTEGER_EXPECTED: &str = "a positive integer";
/// Minimum secret length accepted in release builds.
pub const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing or short secret and warn instead.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Signing secret and lifetimes for issued tokens.
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    /// Access and refresh token lifetimes.
    pub lifetimes: TokenLifetimes,
}

impl TokenSettings {
    /// Raw secret bytes for the codec.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Truncated digest of the secret, safe to log.
    pub fn fingerprint(&self) -> String {
        secret_fingerprint(&self.secret)
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// Neither secret variable is set.
    #[error("missing signing secret: set {SECRET_FILE_ENV} or {SECRET_ENV}")]
    MissingSecret,
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("signing secret from {origin} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        origin: &'static str,
        length: usize,
        min_len: usize,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Build token settings from environment variables and build mode.
///
/// `JWT_SECRET_KEY_FILE` takes precedence over `JWT_SECRET_KEY`. Debug
/// builds fall back to an ephemeral random secret, which invalidates all
/// tokens on restart.
///
/// # Examples
///
/// ```rust
/// use backend::outbound::security::token_config::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET_KEY" => Some("x".repeat(32)),
///     "ACCESS_TOKEN_EXPIRE_MINUTES" => Some("15".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.lifetimes.access.num_minutes(), 15);
/// assert_eq!(settings.lifetimes.refresh.num_days(), 7);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let defaults = TokenLifetimes::default();
    let access = lifetime_from_env(env, ACCESS_MINUTES_ENV, Duration::minutes)?
        .unwrap_or(defaults.access);
    let refresh =
        lifetime_from_env(env, REFRESH_DAYS_ENV, Duration::days)?.unwrap_or(defaults.refresh);
    let secret = secret_from_env(env, mode)?;

    let settings = TokenSettings {
        secret,
        lifetimes: TokenLifetimes { access, refresh },
    };
    info!(
        fingerprint = %settings.fingerprint(),
        access_minutes = access.num_minutes(),
        refresh_days = refresh.num_days(),
        "token signing configured"
    );
    Ok(settings)
}

fn lifetime_from_env<E: Env>(
    env: &E,
    name: &'static str,
    unit: fn(i64) -> Duration,
) -> Result<Option<Duration>, TokenConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(None);
    };
    match value.trim().parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(Some(unit(amount))),
        _ => Err(TokenConfigError::InvalidEnv {
            name,
            value,
            expected: POSITIVE_INTEGER_EXPECTED,
        }),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let (secret, origin) = if let Some(path) = env.string(SECRET_FILE_ENV) {
        let path = PathBuf::from(path);
        let mut bytes = std::fs::read(&path)
            .map_err(|source| TokenConfigError::SecretRead { path, source })?;
        while bytes.last().is_some_and(u8::is_ascii_whitespace) {
            bytes.pop();
        }
        (Zeroizing::new(bytes), SECRET_FILE_ENV)
    } else if let Some(value) = env.string(SECRET_ENV) {
        (Zeroizing::new(value.into_bytes()), SECRET_ENV)
    } else if mode.is_debug() {
        warn!("no signing secret configured; using ephemeral secret (dev only)");
        let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        return Ok(Zeroizing::new(bytes));
    } else {
        return Err(TokenConfigError::MissingSecret);
    };

    if secret.len() < SECRET_MIN_LEN {
        if mode.is_debug() {
            warn!(
                origin,
                length = secret.len(),
                "signing secret shorter than {SECRET_MIN_LEN} bytes"
            );
        } else {
            return Err(TokenConfigError::SecretTooShort {
                origin,
                length: secret.len(),
                min_len: SECRET_MIN_LEN,
            });
        }
    }
    Ok(secret)
}
