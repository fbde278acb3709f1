//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::User;
use crate::domain::ports::{
    MockAccessTokenVerifier, MockAuthCommand, MockGoogleSignIn, MockProfileCommand,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

/// Bearer token accepted by [`MockPorts::authenticated_as`].
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Mocked driving ports; set expectations, then build the app.
#[derive(Default)]
pub struct MockPorts {
    pub auth: MockAuthCommand,
    pub tokens: MockAccessTokenVerifier,
    pub google: MockGoogleSignIn,
    pub profile: MockProfileCommand,
}

impl MockPorts {
    /// Resolve [`TEST_ACCESS_TOKEN`] to `user`; any other token is rejected.
    pub fn authenticated_as(user: User) -> Self {
        let mut ports = Self::default();
        ports.tokens.expect_authenticate().returning(move |token| {
            if token == TEST_ACCESS_TOKEN {
                Ok(user.clone())
            } else {
                Err(crate::domain::Error::unauthorized(
                    "Could not validate credentials",
                ))
            }
        });
        ports
    }

    /// Wrap the mocks in shared HTTP state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.auth),
            Arc::new(self.tokens),
            Arc::new(self.google),
            Arc::new(self.profile),
        )
    }

    /// Application with every API route mounted under `/api/v1`.
    pub fn into_app(
        self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.into_state()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api))
    }
}

/// `Authorization` header value for [`TEST_ACCESS_TOKEN`].
pub fn bearer_header() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TEST_ACCESS_TOKEN}"))
}
