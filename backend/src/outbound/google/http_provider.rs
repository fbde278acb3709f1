//! Reqwest-backed Google identity adapter.
//!
//! Owns transport details only: form encoding, timeouts, HTTP status mapping
//! and JSON decoding into port types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{TokenInfoDto, TokenResponseDto, UserInfoDto};
use crate::domain::ports::{
    GoogleClientCredentials, GoogleIdentityError, GoogleIdentityProvider, GoogleProfile,
    GoogleTokenInfo,
};

/// Request timeout applied to every Google call.
pub const DEFAULT_GOOGLE_TIMEOUT: Duration = Duration::from_secs(10);
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Google endpoints used by the adapter.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub token: Url,
    pub userinfo: Url,
    pub tokeninfo: Url,
}

impl GoogleEndpoints {
    /// Google's public production endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in URLs fail to parse.
    pub fn production() -> Result<Self, url::ParseError> {
        Ok(Self {
            token: Url::parse(TOKEN_URL)?,
            userinfo: Url::parse(USERINFO_URL)?,
            tokeninfo: Url::parse(TOKENINFO_URL)?,
        })
    }
}

/// Google identity adapter sharing one HTTP client.
pub struct HttpGoogleIdentityProvider {
    client: Client,
    endpoints: GoogleEndpoints,
}

impl HttpGoogleIdentityProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoints: GoogleEndpoints, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    async fn fetch_access_token(
        &self,
        credentials: &GoogleClientCredentials,
        code: &str,
    ) -> Result<String, GoogleIdentityError> {
        let response = self
            .client
            .post(self.endpoints.token.clone())
            .form(&[
                ("code", code),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("redirect_uri", credentials.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), GoogleIdentityError::code_exchange));
        }
        let token: TokenResponseDto = decode_json(body.as_ref())?;
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, GoogleIdentityError> {
        let response = self
            .client
            .get(self.endpoints.userinfo.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), GoogleIdentityError::user_info));
        }
        let info: UserInfoDto = decode_json(body.as_ref())?;
        Ok(info.into())
    }
}

#[async_trait]
impl GoogleIdentityProvider for HttpGoogleIdentityProvider {
    async fn exchange_code(
        &self,
        credentials: &GoogleClientCredentials,
        code: &str,
    ) -> Result<GoogleProfile, GoogleIdentityError> {
        let access_token = self.fetch_access_token(credentials, code).await?;
        self.fetch_profile(&access_token).await
    }

    async fn verify_id_token(
        &self,
        id_token: &str,
    ) -> Result<GoogleTokenInfo, GoogleIdentityError> {
        let response = self
            .client
            .get(self.endpoints.tokeninfo.clone())
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(
                status,
                body.as_ref(),
                GoogleIdentityError::invalid_id_token,
            ));
        }
        let info: TokenInfoDto = decode_json(body.as_ref())?;
        Ok(info.into())
    }
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, GoogleIdentityError> {
    serde_json::from_slice(body).map_err(|error| {
        GoogleIdentityError::decode(format!("invalid Google JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> GoogleIdentityError {
    debug!(timeout = error.is_timeout(), "google request failed");
    GoogleIdentityError::transport(error.to_string())
}

/// Client errors are attributed to the caller's input via `rejected`; server
/// errors are transport failures.
fn map_status_error(
    status: StatusCode,
    body: &[u8],
    rejected: fn(String) -> GoogleIdentityError,
) -> GoogleIdentityError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    if status.is_client_error() {
        rejected(message)
    } else {
        GoogleIdentityError::transport(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
