//! Bearer-token extractors keeping handlers free of header parsing.
//!
//! [`CurrentUser`] resolves the `Authorization: Bearer` header through the
//! [`AccessTokenVerifier`](crate::domain::ports::AccessTokenVerifier) port;
//! [`ActiveUser`] additionally requires the account to be active.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";
const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Extract the raw token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; anything other than a single
/// non-empty bearer credential yields `None`.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() || token.contains(' ') {
        return None;
    }
    Some(token.to_owned())
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))
}

/// The account behind a valid access token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Consume the wrapper.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = http_state(req);
        Box::pin(async move {
            let state = state?;
            let token = token.ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))?;
            let user = state.tokens.authenticate(&token).await?;
            Ok(Self(user))
        })
    }
}

/// A [`CurrentUser`] whose account is active.
#[derive(Debug, Clone)]
pub struct ActiveUser(pub User);

impl ActiveUser {
    /// Consume the wrapper.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for ActiveUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentUser::from_request(req, payload);
        Box::pin(async move {
            let CurrentUser(user) = current.await?;
            if !user.is_active {
                return Err(Error::forbidden("Account is not active").into());
            }
            Ok(Self(user))
        })
    }
}
