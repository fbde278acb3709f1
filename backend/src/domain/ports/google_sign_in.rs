//! Driving port for Google OAuth delegation.

use async_trait::async_trait;

use crate::domain::{ClientContext, Error, OAuthSession};

/// Availability of each federated sign-in provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProviderStatus {
    pub google_enabled: bool,
}

/// Domain use-case port for signing in through Google.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleSignIn: Send + Sync {
    /// Which providers are configured.
    fn status(&self) -> OAuthProviderStatus;

    /// Google consent URL, carrying `redirect_uri` as OAuth state when given.
    fn authorization_url(&self, redirect_uri: Option<String>) -> Result<String, Error>;

    /// Finish the authorization-code flow.
    async fn complete_callback(
        &self,
        code: &str,
        client: ClientContext,
    ) -> Result<OAuthSession, Error>;

    /// Sign in with an ID token obtained by the client.
    async fn authenticate_id_token(
        &self,
        id_token: &str,
        client: ClientContext,
    ) -> Result<OAuthSession, Error>;
}
