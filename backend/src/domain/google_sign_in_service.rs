//! Google OAuth delegation service.
//!
//! Implements the [`GoogleSignIn`] driving port. The identity provider
//! adapter verifies who the caller is; this service resolves or creates the
//! matching account and issues local tokens.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::ports::{
    GoogleClientCredentials, GoogleIdentityError, GoogleIdentityProvider, GoogleProfile,
    GoogleSignIn, OAuthProviderStatus, PasswordHasher, TokenCodec, UserRepository,
};
use crate::domain::service_support::{
    allocate_referral_code, issue_session, map_password_hash_error, map_user_persistence_error,
};
use crate::domain::{
    ActivityEntry, ActivityKind, ClientContext, Email, Error, FederatedAccount, OAuthSession,
    PlainPassword, User,
};

/// Google's OAuth 2.0 consent endpoint.
pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_SCOPES: &str = "openid email profile";
const NOT_CONFIGURED: &str = "Google OAuth is not configured";
const UNUSABLE_PASSWORD_LEN: usize = 32;

/// Google OAuth client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleOAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    /// Frontend URL carried as OAuth state when the caller names none.
    pub frontend_url: Option<String>,
}

impl GoogleOAuthConfig {
    fn credentials(&self) -> Result<GoogleClientCredentials, Error> {
        match (&self.client_id, &self.client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(GoogleClientCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                redirect_uri: self.redirect_uri.clone(),
            }),
            _ => Err(Error::service_unavailable(NOT_CONFIGURED)),
        }
    }
}

/// Google sign-in service.
#[derive(Clone)]
pub struct GoogleSignInService<R, G> {
    users: Arc<R>,
    provider: Arc<G>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
    config: GoogleOAuthConfig,
}

impl<R, G> GoogleSignInService<R, G> {
    /// Create the service from its collaborators and client configuration.
    pub fn new(
        users: Arc<R>,
        provider: Arc<G>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
        config: GoogleOAuthConfig,
    ) -> Self {
        Self {
            users,
            provider,
            hasher,
            tokens,
            clock,
            config,
        }
    }
}

fn map_callback_error(error: GoogleIdentityError) -> Error {
    match error {
        GoogleIdentityError::CodeExchange { .. } => {
            debug!(kind = error.kind(), "google rejected the authorization code");
            Error::invalid_request("Failed to exchange authorization code")
        }
        GoogleIdentityError::UserInfo { .. } => {
            debug!(kind = error.kind(), "google userinfo failed");
            Error::invalid_request("Failed to get user info from Google")
        }
        other => {
            warn!(kind = other.kind(), error = %other, "google callback failed");
            Error::internal_with_detail("Failed to complete Google authentication")
        }
    }
}

fn map_id_token_error(error: GoogleIdentityError) -> Error {
    match error {
        GoogleIdentityError::InvalidIdToken { .. } => Error::unauthorized("Invalid Google ID token"),
        other => {
            warn!(kind = other.kind(), error = %other, "google id token verification failed");
            Error::internal_with_detail("Failed to authenticate with Google")
        }
    }
}

fn unusable_password() -> PlainPassword {
    let raw: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNUSABLE_PASSWORD_LEN)
        .map(char::from)
        .collect();
    PlainPassword::new(raw)
}

/// Names asserted by Google, falling back to the email local part.
fn federated_names(profile: &GoogleProfile, email: &Email) -> (String, String) {
    let first = profile
        .given_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| {
            email
                .as_str()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_owned()
        });
    let last = profile
        .family_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_owned();
    (first, last)
}

impl<R, G> GoogleSignInService<R, G>
where
    R: UserRepository,
    G: GoogleIdentityProvider,
{
    async fn create_account(&self, profile: &GoogleProfile, email: Email) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(&unusable_password())
            .map_err(map_password_hash_error)?;
        let referral_code = allocate_referral_code(self.users.as_ref()).await?;
        let (first_name, last_name) = federated_names(profile, &email);
        Ok(User::from_google(
            FederatedAccount {
                google_id: profile.subject.clone(),
                email,
                first_name,
                last_name,
                profile_photo: profile.picture.clone(),
                password_hash,
            },
            referral_code,
            self.clock.utc(),
        ))
    }

    /// Find the account for `profile`, linking or creating it as needed.
    async fn resolve_account(
        &self,
        profile: &GoogleProfile,
        email: Email,
    ) -> Result<(User, bool), Error> {
        if let Some(user) = self
            .users
            .find_by_google_id(&profile.subject)
            .await
            .map_err(map_user_persistence_error)?
        {
            return Ok((user, false));
        }
        if let Some(mut user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
        {
            info!(user_id = %user.id, "linking google account to existing user");
            user.google_id = Some(profile.subject.clone());
            user.is_email_verified = true;
            return Ok((user, false));
        }
        Ok((self.create_account(profile, email).await?, true))
    }

    async fn sign_in(
        &self,
        profile: GoogleProfile,
        raw_email: &str,
        client: ClientContext,
    ) -> Result<OAuthSession, Error> {
        let email = Email::parse(raw_email)
            .map_err(|_| Error::invalid_request("Google returned an invalid email address"))?;
        let (mut user, is_new_user) = self.resolve_account(&profile, email).await?;
        if user.is_deleted {
            return Err(Error::forbidden("Account has been deleted"));
        }

        let now = self.clock.utc();
        user.record_login(now);
        let picture = profile.picture.filter(|url| !url.is_empty());
        if picture.is_some() && user.profile_photo != picture {
            user.profile_photo = picture;
        }
        user.record_activity(ActivityEntry::new(
            ActivityKind::GoogleLogin,
            "Signed in with Google",
            &client,
            now,
        ));

        let persisted = if is_new_user {
            self.users.insert(&user).await
        } else {
            self.users.update(&user).await
        };
        persisted.map_err(map_user_persistence_error)?;

        info!(user_id = %user.id, is_new_user, "google sign-in completed");
        let session = issue_session(self.tokens.as_ref(), user)?;
        Ok(OAuthSession {
            session,
            is_new_user,
        })
    }
}

#[async_trait]
impl<R, G> GoogleSignIn for GoogleSignInService<R, G>
where
    R: UserRepository,
    G: GoogleIdentityProvider,
{
    fn status(&self) -> OAuthProviderStatus {
        OAuthProviderStatus {
            google_enabled: self.config.client_id.is_some(),
        }
    }

    fn authorization_url(&self, redirect_uri: Option<String>) -> Result<String, Error> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| Error::service_unavailable(NOT_CONFIGURED))?;
        let mut params = vec![
            ("client_id", client_id),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", GOOGLE_SCOPES),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];
        let state = redirect_uri.or_else(|| self.config.frontend_url.clone());
        if let Some(state) = state.as_deref() {
            params.push(("state", state));
        }
        Url::parse_with_params(GOOGLE_AUTHORIZE_URL, &params)
            .map(String::from)
            .map_err(|error| Error::internal(format!("invalid google authorize url: {error}")))
    }

    async fn complete_callback(
        &self,
        code: &str,
        client: ClientContext,
    ) -> Result<OAuthSession, Error> {
        let credentials = self.config.credentials()?;
        let profile = self
            .provider
            .exchange_code(&credentials, code)
            .await
            .map_err(map_callback_error)?;
        let Some(email) = profile.email.clone() else {
            return Err(Error::invalid_request("Email not provided by Google"));
        };
        self.sign_in(profile, &email, client).await
    }

    async fn authenticate_id_token(
        &self,
        id_token: &str,
        client: ClientContext,
    ) -> Result<OAuthSession, Error> {
        let client_id = self
            .config
            .client_id
            .clone()
            .ok_or_else(|| Error::service_unavailable(NOT_CONFIGURED))?;
        let info = self
            .provider
            .verify_id_token(id_token)
            .await
            .map_err(map_id_token_error)?;
        if info.audience != client_id {
            return Err(Error::unauthorized("Token not issued for this application"));
        }
        let Some(email) = info.profile.email.clone() else {
            return Err(Error::invalid_request("Email not provided in token"));
        };
        self.sign_in(info.profile, &email, client).await
    }
}

#[cfg(test)]
#[path = "google_sign_in_service_tests.rs"]
mod tests;
