//! Credential adapters: token signing and password hashing.

mod argon2_password_hasher;
mod jwt_token_codec;
pub mod token_config;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_codec::{JwtTokenCodec, TokenLifetimes};
pub use token_config::{BuildMode, TokenConfigError, TokenSettings, token_settings_from_env};
