//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint of the inbound layer (auth, users,
//!   dashboards, health)
//! - **Schemas**: request and response payloads, plus wrappers that describe
//!   domain documents without coupling domain types to utoipa
//! - **Security**: HTTP bearer authentication with JWT access tokens
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::auth::{
    AccessTokenResponse, GoogleLoginResponse, GoogleTokenRequest, LoginRequest, OAuthResponse,
    OAuthStatusResponse, ProviderStatus, RefreshRequest, RegisterRequest, RegistrationResponse,
    TokenResponse,
};
use crate::inbound::http::dashboards::{
    DashboardOverviewResponse, DashboardStatsResponse, RecommendationsResponse,
    UserDashboardResponse,
};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    AddressSchema, NotificationPreferencesSchema, SuccessResponse, TravelPreferencesSchema,
    UserResponse,
};
use crate::inbound::http::users::{
    ActivityPageResponse, AddressAddedResponse, AddressRequest, ChangePasswordRequest,
    CoverPhotoRequest, CoverPhotoResponse, FavoriteDestinationRequest, FavoriteVendorRequest,
    FavoritesResponse, NotificationPreferencesUpdatedResponse, PreferencesResponse,
    PreferencesUpdatedResponse, ProfilePhotoRequest, ProfilePhotoResponse, ReferralsResponse,
    UpdatePreferencesRequest, UpdateProfileRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /api/v1/users/login or the Google flow.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Travel platform API",
        description = "Account registration, bearer-token authentication, Google sign-in, profiles and dashboards."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::oauth_status,
        crate::inbound::http::auth::google_login,
        crate::inbound::http::auth::google_callback,
        crate::inbound::http::auth::google_token,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::delete_current_user,
        crate::inbound::http::users::update_profile_photo,
        crate::inbound::http::users::update_cover_photo,
        crate::inbound::http::users::get_preferences,
        crate::inbound::http::users::update_preferences,
        crate::inbound::http::users::update_notification_preferences,
        crate::inbound::http::users::list_addresses,
        crate::inbound::http::users::add_address,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::list_activity,
        crate::inbound::http::users::get_referrals,
        crate::inbound::http::users::get_favorites,
        crate::inbound::http::users::add_favorite_destination,
        crate::inbound::http::users::remove_favorite_destination,
        crate::inbound::http::users::add_favorite_vendor,
        crate::inbound::http::users::remove_favorite_vendor,
        crate::inbound::http::dashboards::user_dashboard,
        crate::inbound::http::dashboards::user_dashboard_stats,
        crate::inbound::http::dashboards::user_dashboard_overview,
        crate::inbound::http::dashboards::user_recommendations,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        SuccessResponse,
        UserResponse,
        TravelPreferencesSchema,
        NotificationPreferencesSchema,
        AddressSchema,
        RegisterRequest,
        RegistrationResponse,
        LoginRequest,
        TokenResponse,
        OAuthResponse,
        RefreshRequest,
        AccessTokenResponse,
        ProviderStatus,
        OAuthStatusResponse,
        GoogleLoginResponse,
        GoogleTokenRequest,
        AddressRequest,
        AddressAddedResponse,
        PreferencesResponse,
        PreferencesUpdatedResponse,
        NotificationPreferencesUpdatedResponse,
        UpdateProfileRequest,
        UpdatePreferencesRequest,
        ProfilePhotoRequest,
        ProfilePhotoResponse,
        CoverPhotoRequest,
        CoverPhotoResponse,
        ChangePasswordRequest,
        ActivityPageResponse,
        ReferralsResponse,
        FavoritesResponse,
        FavoriteDestinationRequest,
        FavoriteVendorRequest,
        UserDashboardResponse,
        DashboardStatsResponse,
        DashboardOverviewResponse,
        RecommendationsResponse,
    )),
    tags(
        (name = "auth", description = "Registration, tokens and Google sign-in"),
        (name = "users", description = "The authenticated account"),
        (name = "dashboards", description = "Read-only account dashboards"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/users/register")]
    #[case("/api/v1/users/login")]
    #[case("/api/v1/auth/google/callback")]
    #[case("/api/v1/users/me")]
    #[case("/api/v1/users/me/favorites/destinations/{destination}")]
    #[case("/api/v1/users/me/favorites/vendors/{vendor_id}")]
    #[case("/api/v1/users/me/addresses")]
    #[case("/api/v1/dashboards/user/overview")]
    #[case("/health/ready")]
    fn documents_every_endpoint_group(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn error_body_documents_detail() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("ErrorBody").expect("ErrorBody schema");

        assert_object_schema_has_field(error_schema, "detail");
        assert_object_schema_has_field(error_schema, "trace_id");
    }

    #[test]
    fn token_response_documents_lifetime() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let token_schema = schemas.get("TokenResponse").expect("TokenResponse schema");

        assert_object_schema_has_field(token_schema, "expires_in");
        assert_object_schema_has_field(token_schema, "token_type");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }

    #[test]
    fn referral_code_examples_are_well_formed() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise document");
        let schemas = doc["components"]["schemas"]
            .as_object()
            .expect("schemas object");

        let examples: Vec<&str> = schemas
            .values()
            .filter_map(|schema| {
                let field = &schema["properties"]["referral_code"];
                field["example"].as_str().or_else(|| field["examples"][0].as_str())
            })
            .collect();

        assert!(!examples.is_empty(), "no referral_code example documented");
        for example in examples {
            assert!(
                crate::domain::ReferralCode::parse(example).is_ok(),
                "{example} is not a referral code"
            );
        }
    }
}
