//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/users/register {"email":"ada@example.com","password":"Analytical1",...}
//! POST /api/v1/users/login {"email":"ada@example.com","password":"Analytical1"}
//! POST /api/v1/auth/refresh {"refresh_token":"..."}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/oauth/status
//! GET  /api/v1/auth/google/login?redirect_uri=...
//! GET  /api/v1/auth/google/callback?code=...&state=...
//! POST /api/v1/auth/google/token {"id_token":"..."}
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::LogoutRequest;
use crate::domain::{
    AuthSession, Error, LoginCredentials, OAuthSession, RefreshedAccess, RegistrationReceipt,
    RegistrationRequest, TOKEN_TYPE_BEARER,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::bearer_token;
use crate::inbound::http::client::Client;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{SuccessResponse, UserResponse};
use crate::inbound::http::state::HttpState;

/// Path clients follow to start the Google flow.
pub const GOOGLE_LOGIN_PATH: &str = "/api/v1/auth/google/login";
const REGISTERED_MESSAGE: &str = "Account created successfully. Please verify your email.";
const LOGGED_OUT_MESSAGE: &str = "Logged out successfully";

/// Registration payload for `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Analytical1")]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl TryFrom<RegisterRequest> for RegistrationRequest {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.password,
            &value.first_name,
            &value.last_name,
            value.phone.as_deref(),
        )
        .map_err(|err| Error::unprocessable(err.to_string()))
    }
}

/// Body returned once an account has been created.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: String,
    pub user_id: Uuid,
    pub email: String,
    pub referral_code: String,
}

impl From<RegistrationReceipt> for RegistrationResponse {
    fn from(receipt: RegistrationReceipt) -> Self {
        Self {
            success: true,
            message: REGISTERED_MESSAGE.to_owned(),
            user_id: *receipt.user_id.as_uuid(),
            email: receipt.email.as_str().to_owned(),
            referral_code: receipt.referral_code.as_str().to_owned(),
        }
    }
}

/// Login payload for `POST /api/v1/users/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
            .map_err(|err| Error::unprocessable(err.to_string()))
    }
}

/// Access/refresh token pair with the signed-in account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[schema(example = 1800)]
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<AuthSession> for TokenResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_owned(),
            expires_in: session.expires_in,
            user: UserResponse::from(session.user),
        }
    }
}

/// [`TokenResponse`] for federated sign-in, flagging first-time accounts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OAuthResponse {
    #[serde(flatten)]
    pub tokens: TokenResponse,
    pub is_new_user: bool,
}

impl From<OAuthSession> for OAuthResponse {
    fn from(value: OAuthSession) -> Self {
        Self {
            tokens: TokenResponse::from(value.session),
            is_new_user: value.is_new_user,
        }
    }
}

/// Refresh token carried in a JSON body or the query string.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Fresh access token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    #[schema(example = 1800)]
    pub expires_in: i64,
}

impl From<RefreshedAccess> for AccessTokenResponse {
    fn from(value: RefreshedAccess) -> Self {
        Self {
            access_token: value.access_token,
            token_type: TOKEN_TYPE_BEARER.to_owned(),
            expires_in: value.expires_in,
        }
    }
}

/// Availability of one federated provider.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProviderStatus {
    pub enabled: bool,
    pub login_url: Option<String>,
}

impl ProviderStatus {
    fn disabled() -> Self {
        Self {
            enabled: false,
            login_url: None,
        }
    }
}

/// Federated provider availability.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OAuthStatusResponse {
    pub google: ProviderStatus,
    pub facebook: ProviderStatus,
    pub apple: ProviderStatus,
}

/// Query for `GET /api/v1/auth/google/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GoogleLoginQuery {
    /// Where the callback should send the browser once signed in.
    pub redirect_uri: Option<String>,
}

/// Consent URL for the Google flow.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GoogleLoginResponse {
    pub auth_url: String,
}

/// Query Google sends to the callback.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GoogleCallbackQuery {
    pub code: String,
    pub state: Option<String>,
}

/// ID token obtained by a client-side Google sign-in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GoogleTokenRequest {
    pub id_token: String,
}

/// Create a pending account.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegistrationResponse),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    client: Client,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = RegistrationRequest::try_from(payload.into_inner())?;
    let receipt = state.auth.register(request, client.into_inner()).await?;
    Ok(HttpResponse::Created().json(RegistrationResponse::from(receipt)))
}

/// Exchange credentials for an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    client: Client,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.auth.login(credentials, client.into_inner()).await?;
    Ok(web::Json(TokenResponse::from(session)))
}

fn presented_refresh_token(
    body: Option<web::Json<RefreshRequest>>,
    query: RefreshRequest,
) -> Option<String> {
    body.and_then(|json| json.into_inner().refresh_token)
        .or(query.refresh_token)
        .filter(|token| !token.trim().is_empty())
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body(content = RefreshRequest, description = "Optional when passed as a query parameter"),
    params(("refresh_token" = Option<String>, Query, description = "Alternative to the JSON body")),
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorBody),
        (status = 422, description = "No refresh token supplied", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    query: web::Query<RefreshRequest>,
    body: Option<web::Json<RefreshRequest>>,
) -> ApiResult<web::Json<AccessTokenResponse>> {
    let token = presented_refresh_token(body, query.into_inner())
        .ok_or_else(|| Error::unprocessable("refresh_token is required"))?;
    let access = state.auth.refresh(&token).await?;
    Ok(web::Json(AccessTokenResponse::from(access)))
}

/// Revoke the presented refresh token. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body(content = RefreshRequest, description = "Optional"),
    params(("refresh_token" = Option<String>, Query, description = "Alternative to the JSON body")),
    responses((status = 200, description = "Logged out", body = SuccessResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security((), ("bearer" = []))
)]
#[post("/auth/logout")]
pub async fn logout(
    req: HttpRequest,
    state: web::Data<HttpState>,
    client: Client,
    query: web::Query<RefreshRequest>,
    body: Option<web::Json<RefreshRequest>>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let request = LogoutRequest {
        refresh_token: presented_refresh_token(body, query.into_inner()),
        access_token: bearer_token(&req),
    };
    state.auth.logout(request, client.into_inner()).await?;
    Ok(web::Json(SuccessResponse::new(LOGGED_OUT_MESSAGE)))
}

/// Report which federated sign-in providers are configured.
#[utoipa::path(
    get,
    path = "/api/v1/auth/oauth/status",
    responses((status = 200, description = "Provider availability", body = OAuthStatusResponse)),
    tags = ["auth"],
    operation_id = "oauthStatus",
    security([])
)]
#[get("/auth/oauth/status")]
pub async fn oauth_status(state: web::Data<HttpState>) -> web::Json<OAuthStatusResponse> {
    let status = state.google.status();
    let google = ProviderStatus {
        enabled: status.google_enabled,
        login_url: status.google_enabled.then(|| GOOGLE_LOGIN_PATH.to_owned()),
    };
    web::Json(OAuthStatusResponse {
        google,
        facebook: ProviderStatus::disabled(),
        apple: ProviderStatus::disabled(),
    })
}

/// Build the Google consent URL.
#[utoipa::path(
    get,
    path = "/api/v1/auth/google/login",
    params(("redirect_uri" = Option<String>, Query, description = "Frontend URL to return to")),
    responses(
        (status = 200, description = "Consent URL", body = GoogleLoginResponse),
        (status = 503, description = "Google OAuth is not configured", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "googleLogin",
    security([])
)]
#[get("/auth/google/login")]
pub async fn google_login(
    state: web::Data<HttpState>,
    query: web::Query<GoogleLoginQuery>,
) -> ApiResult<web::Json<GoogleLoginResponse>> {
    let auth_url = state
        .google
        .authorization_url(query.into_inner().redirect_uri)?;
    Ok(web::Json(GoogleLoginResponse { auth_url }))
}

/// Frontend URL carried in OAuth state, if the state names one.
///
/// Values that do not start with `http` are opaque and ignored; values that
/// do must parse as a URL.
fn redirect_target(state: Option<String>) -> Result<Option<Url>, Error> {
    state
        .filter(|value| value.starts_with("http"))
        .map(|value| {
            Url::parse(&value).map_err(|err| {
                warn!(error = %err, "oauth state is not a valid URL");
                Error::invalid_request("Invalid redirect URL")
            })
        })
        .transpose()
}

/// Append the issued tokens to the frontend URL.
fn frontend_redirect(mut url: Url, session: &AuthSession) -> String {
    url.query_pairs_mut()
        .append_pair("access_token", &session.access_token)
        .append_pair("refresh_token", &session.refresh_token);
    url.into()
}

/// Finish the Google authorization-code flow.
///
/// When `state` holds a frontend URL the browser is redirected there with the
/// tokens in the query string; otherwise the tokens are returned as JSON.
#[utoipa::path(
    get,
    path = "/api/v1/auth/google/callback",
    params(
        ("code" = String, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "Frontend URL passed at login")
    ),
    responses(
        (status = 200, description = "Signed in", body = OAuthResponse),
        (status = 302, description = "Redirect to the frontend with tokens"),
        (status = 400, description = "Invalid redirect URL or rejected exchange", body = ErrorBody),
        (status = 503, description = "Google OAuth is not configured", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "googleCallback",
    security([])
)]
#[get("/auth/google/callback")]
pub async fn google_callback(
    state: web::Data<HttpState>,
    client: Client,
    query: web::Query<GoogleCallbackQuery>,
) -> ApiResult<HttpResponse> {
    let GoogleCallbackQuery { code, state: oauth_state } = query.into_inner();
    let target = redirect_target(oauth_state)?;
    let outcome = state
        .google
        .complete_callback(&code, client.into_inner())
        .await?;

    match target {
        Some(url) => {
            let location = frontend_redirect(url, &outcome.session);
            Ok(HttpResponse::Found()
                .insert_header((LOCATION, location))
                .finish())
        }
        None => Ok(HttpResponse::Ok().json(OAuthResponse::from(outcome))),
    }
}

/// Sign in with a Google ID token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/google/token",
    request_body = GoogleTokenRequest,
    responses(
        (status = 200, description = "Signed in", body = OAuthResponse),
        (status = 400, description = "Email not provided in token", body = ErrorBody),
        (status = 401, description = "Invalid Google ID token", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "googleToken",
    security([])
)]
#[post("/auth/google/token")]
pub async fn google_token(
    state: web::Data<HttpState>,
    client: Client,
    payload: web::Json<GoogleTokenRequest>,
) -> ApiResult<web::Json<OAuthResponse>> {
    let outcome = state
        .google
        .authenticate_id_token(&payload.id_token, client.into_inner())
        .await?;
    Ok(web::Json(OAuthResponse::from(outcome)))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
