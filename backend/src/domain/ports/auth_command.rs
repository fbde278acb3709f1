//! Driving port for password registration and token lifecycle use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! register accounts and exchange credentials for tokens without knowing the
//! backing infrastructure.

use async_trait::async_trait;

use crate::domain::{
    AuthSession, ClientContext, Error, LoginCredentials, RefreshedAccess, RegistrationReceipt,
    RegistrationRequest,
};

/// Tokens presented at logout; either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
}

/// Domain use-case port for account authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Create a pending account.
    async fn register(
        &self,
        request: RegistrationRequest,
        client: ClientContext,
    ) -> Result<RegistrationReceipt, Error>;

    /// Validate credentials and issue an access/refresh token pair.
    async fn login(
        &self,
        credentials: LoginCredentials,
        client: ClientContext,
    ) -> Result<AuthSession, Error>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess, Error>;

    /// Revoke the presented refresh token and record the logout.
    ///
    /// Invalid tokens are ignored so logout always succeeds for callers.
    async fn logout(&self, request: LogoutRequest, client: ClientContext) -> Result<(), Error>;
}
