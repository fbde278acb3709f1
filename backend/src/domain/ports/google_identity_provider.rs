//! Driven port for Google identity verification.
//!
//! Adapters talk to Google's OAuth token, userinfo and tokeninfo endpoints and
//! return the asserted identity. Account resolution stays in the domain.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by Google identity adapters.
    pub enum GoogleIdentityError {
        /// The authorization code was rejected.
        CodeExchange { message: String } => "google code exchange failed: {message}",
        /// The access token could not be used to fetch the profile.
        UserInfo { message: String } => "google userinfo request failed: {message}",
        /// Google rejected the ID token.
        InvalidIdToken { message: String } => "google id token rejected: {message}",
        /// Network failure talking to Google.
        Transport { message: String } => "google request failed: {message}",
        /// Google answered with an unexpected payload.
        Decode { message: String } => "google response could not be decoded: {message}",
    }
}

/// Identity asserted by Google.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleProfile {
    /// Stable Google account identifier (`sub`).
    pub subject: String,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// Verified ID token contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleTokenInfo {
    /// Client id the token was issued for (`aud`).
    pub audience: String,
    pub profile: GoogleProfile,
}

/// OAuth client credentials registered with Google.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Verify identities with Google.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleIdentityProvider: Send + Sync {
    /// Exchange an authorization code and fetch the resulting profile.
    async fn exchange_code(
        &self,
        credentials: &GoogleClientCredentials,
        code: &str,
    ) -> Result<GoogleProfile, GoogleIdentityError>;

    /// Verify a client-obtained ID token.
    async fn verify_id_token(&self, id_token: &str)
    -> Result<GoogleTokenInfo, GoogleIdentityError>;
}
