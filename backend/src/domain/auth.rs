//! Authentication primitives: credentials, registration input and tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Email, PasswordPolicyError, PersonName, PlainPassword, ReferralCode, User, UserId,
    UserValidationError,
};

/// Access token lifetime used when none is configured.
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 30;
/// Refresh token lifetime used when none is configured.
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;
/// Token type advertised to clients.
pub const TOKEN_TYPE_BEARER: &str = "bearer";
/// Audience marker carried by every token issued to end users.
pub const USER_TOKEN_AUDIENCE: &str = "user";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised through [`Email::parse`].
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "password").unwrap();
/// assert_eq!(creds.email().as_str(), "ada@example.com");
/// assert_eq!(creds.password().expose(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: PlainPassword,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::parse(email).map_err(LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: PlainPassword::new(password),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// Reasons a registration payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("{0}")]
    Field(#[from] UserValidationError),
    #[error("{0}")]
    Password(#[from] PasswordPolicyError),
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: Email,
    pub password: PlainPassword,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl RegistrationRequest {
    /// Validate raw registration fields.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::RegistrationRequest;
    ///
    /// let request = RegistrationRequest::try_from_parts(
    ///     "ada@example.com",
    ///     "Analytical1",
    ///     "Ada",
    ///     "Lovelace",
    ///     None,
    /// )
    /// .expect("valid registration");
    /// assert_eq!(request.first_name, "Ada");
    ///
    /// let weak = RegistrationRequest::try_from_parts(
    ///     "ada@example.com", "NoDigitsHere", "Ada", "Lovelace", None,
    /// );
    /// assert_eq!(
    ///     weak.unwrap_err().to_string(),
    ///     "Password must contain at least one digit"
    /// );
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let email = Email::parse(email)?;
        let password = PlainPassword::new_checked(password)?;
        let first_name = PersonName::parse("first_name", first_name)?.into_inner();
        let last_name = PersonName::parse("last_name", last_name)?.into_inner();
        let phone = phone
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(Self {
            email,
            password,
            first_name,
            last_name,
            phone,
        })
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub user_id: UserId,
    pub email: Email,
    pub referral_code: ReferralCode,
}

/// Distinguishes short-lived access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id.
    pub sub: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub user_type: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    /// Claims for `user` valid from `issued_at` until `expires_at`.
    #[must_use]
    pub fn for_user(
        user: &UserId,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user.to_string(),
            kind,
            user_type: USER_TOKEN_AUDIENCE.to_owned(),
            jti: Uuid::new_v4(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Expiry instant; falls back to the epoch for out-of-range values.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Whether the token was issued to an end user.
    #[must_use]
    pub fn is_user_token(&self) -> bool {
        self.user_type == USER_TOKEN_AUDIENCE
    }
}

/// Signed token together with its claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Tokens and profile returned by a password login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

/// Tokens and profile returned by a Google sign-in.
#[derive(Debug, Clone)]
pub struct OAuthSession {
    pub session: AuthSession,
    pub is_new_user: bool,
}

/// New access token minted from a refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub expires_in: i64,
}
