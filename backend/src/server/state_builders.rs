//! Builders wiring domain services onto repository adapters for HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use backend::domain::ports::{PasswordHasher, TokenCodec, TokenRevocationStore, UserRepository};
use backend::domain::{AccessTokenService, AuthService, GoogleSignInService, ProfileService};
use backend::inbound::http::state::HttpState;
use backend::outbound::google::{
    DEFAULT_GOOGLE_TIMEOUT, GoogleEndpoints, HttpGoogleIdentityProvider,
};
use backend::outbound::memory::{InMemoryTokenRevocationStore, InMemoryUserRepository};
use backend::outbound::persistence::{DieselTokenRevocationStore, DieselUserRepository};
use backend::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

use super::ServerConfig;

/// Adapters shared by every service regardless of the storage backend.
struct SharedAdapters {
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
    google: Arc<HttpGoogleIdentityProvider>,
}

impl SharedAdapters {
    fn from_config(config: &ServerConfig) -> std::io::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let tokens = JwtTokenCodec::new(
            config.tokens.secret(),
            config.tokens.lifetimes,
            clock.clone(),
        );
        let endpoints = GoogleEndpoints::production()
            .map_err(|err| std::io::Error::other(format!("invalid Google endpoint: {err}")))?;
        let google = HttpGoogleIdentityProvider::new(endpoints, DEFAULT_GOOGLE_TIMEOUT)
            .map_err(|err| std::io::Error::other(format!("Google HTTP client failed: {err}")))?;
        Ok(Self {
            hasher: Arc::new(Argon2PasswordHasher::new()),
            tokens: Arc::new(tokens),
            clock,
            google: Arc::new(google),
        })
    }
}

/// Wire the use-case services over one user repository and revocation store.
fn build_services<R, S>(
    users: Arc<R>,
    revocations: Arc<S>,
    shared: SharedAdapters,
    config: &ServerConfig,
) -> HttpState
where
    R: UserRepository + 'static,
    S: TokenRevocationStore + 'static,
{
    let SharedAdapters {
        hasher,
        tokens,
        clock,
        google,
    } = shared;

    let auth = AuthService::new(
        users.clone(),
        revocations,
        hasher.clone(),
        tokens.clone(),
        clock.clone(),
    );
    let verifier = AccessTokenService::new(users.clone(), tokens.clone());
    let google = GoogleSignInService::new(
        users.clone(),
        google,
        hasher.clone(),
        tokens,
        clock.clone(),
        config.google.clone(),
    );
    let profile = ProfileService::new(users, hasher, clock);

    HttpState::new(
        Arc::new(auth),
        Arc::new(verifier),
        Arc::new(google),
        Arc::new(profile),
    )
}

/// Build HTTP state backed by PostgreSQL when a pool is configured, and by
/// process-local stores otherwise.
///
/// # Errors
/// Returns [`std::io::Error`] when the Google HTTP client cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let shared = SharedAdapters::from_config(config)?;
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            build_services(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselTokenRevocationStore::new(pool.clone())),
                shared,
                config,
            )
        }
        None => {
            info!("no database configured; using in-memory repositories");
            build_services(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTokenRevocationStore::new()),
                shared,
                config,
            )
        }
    };
    Ok(state)
}
