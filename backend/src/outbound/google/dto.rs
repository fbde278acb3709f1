//! DTOs for decoding Google OAuth responses.

use serde::Deserialize;

use crate::domain::ports::{GoogleProfile, GoogleTokenInfo};

/// Token endpoint response; only the access token is used.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
}

/// `oauth2/v2/userinfo` response.
#[derive(Debug, Deserialize)]
pub(super) struct UserInfoDto {
    pub(super) id: String,
    pub(super) email: Option<String>,
    pub(super) given_name: Option<String>,
    pub(super) family_name: Option<String>,
    pub(super) picture: Option<String>,
}

/// `tokeninfo` response for an ID token.
#[derive(Debug, Deserialize)]
pub(super) struct TokenInfoDto {
    pub(super) aud: String,
    pub(super) sub: String,
    pub(super) email: Option<String>,
    pub(super) given_name: Option<String>,
    pub(super) family_name: Option<String>,
    pub(super) picture: Option<String>,
}

impl From<UserInfoDto> for GoogleProfile {
    fn from(dto: UserInfoDto) -> Self {
        Self {
            subject: dto.id,
            email: dto.email,
            given_name: dto.given_name,
            family_name: dto.family_name,
            picture: dto.picture,
        }
    }
}

impl From<TokenInfoDto> for GoogleTokenInfo {
    fn from(dto: TokenInfoDto) -> Self {
        Self {
            audience: dto.aud,
            profile: GoogleProfile {
                subject: dto.sub,
                email: dto.email,
                given_name: dto.given_name,
                family_name: dto.family_name,
                picture: dto.picture,
            },
        }
    }
}
