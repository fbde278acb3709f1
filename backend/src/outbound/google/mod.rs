//! Google OAuth adapter.

mod dto;
mod http_provider;

pub use http_provider::{DEFAULT_GOOGLE_TIMEOUT, GoogleEndpoints, HttpGoogleIdentityProvider};
