//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, token signing, identity providers)
//! expose typed errors declared through [`define_port_error`]. Driving ports
//! return domain [`crate::domain::Error`] values that inbound adapters map
//! straight onto HTTP responses.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_verifier;
mod auth_command;
mod google_identity_provider;
mod google_sign_in;
mod password_hasher;
mod profile_command;
mod readiness_probe;
mod token_codec;
mod token_revocation_store;
mod user_repository;

pub use access_token_verifier::AccessTokenVerifier;
#[cfg(test)]
pub use access_token_verifier::MockAccessTokenVerifier;
pub use auth_command::{AuthCommand, LogoutRequest};
#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use google_identity_provider::{
    GoogleClientCredentials, GoogleIdentityError, GoogleIdentityProvider, GoogleProfile,
    GoogleTokenInfo,
};
#[cfg(test)]
pub use google_identity_provider::MockGoogleIdentityProvider;
pub use google_sign_in::{GoogleSignIn, OAuthProviderStatus};
#[cfg(test)]
pub use google_sign_in::MockGoogleSignIn;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use readiness_probe::MockReadinessProbe;
pub use readiness_probe::{ReadinessError, ReadinessProbe};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use token_revocation_store::MockTokenRevocationStore;
pub use token_revocation_store::{TokenRevocationError, TokenRevocationStore};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
