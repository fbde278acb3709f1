//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccessTokenVerifier, AuthCommand, GoogleSignIn, ProfileCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
    pub google: Arc<dyn GoogleSignIn>,
    pub profile: Arc<dyn ProfileCommand>,
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{AccessTokenVerifier, AuthCommand, GoogleSignIn, ProfileCommand};
    /// use backend::inbound::http::state::HttpState;
    ///
    /// fn wire(
    ///     auth: Arc<dyn AuthCommand>,
    ///     tokens: Arc<dyn AccessTokenVerifier>,
    ///     google: Arc<dyn GoogleSignIn>,
    ///     profile: Arc<dyn ProfileCommand>,
    /// ) -> HttpState {
    ///     HttpState::new(auth, tokens, google, profile)
    /// }
    /// ```
    pub fn new(
        auth: Arc<dyn AuthCommand>,
        tokens: Arc<dyn AccessTokenVerifier>,
        google: Arc<dyn GoogleSignIn>,
        profile: Arc<dyn ProfileCommand>,
    ) -> Self {
        Self {
            auth,
            tokens,
            google,
            profile,
        }
    }
}
