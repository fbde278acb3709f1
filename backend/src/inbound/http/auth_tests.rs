//! Tests for authentication API handlers.

use super::*;
use crate::domain::ports::OAuthProviderStatus;
use crate::domain::user::fixtures::sample_user;
use crate::domain::{Email, ReferralCode, UserId};
use crate::inbound::http::test_utils::{MockPorts, bearer_header};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

fn session() -> AuthSession {
    AuthSession {
        access_token: "access".into(),
        refresh_token: "refresh".into(),
        expires_in: 1800,
        user: sample_user(),
    }
}

fn register_body(password: &str) -> Value {
    json!({
        "email": "ada@example.com",
        "password": password,
        "first_name": "Ada",
        "last_name": "Lovelace"
    })
}

async fn detail_of(response: actix_web::dev::ServiceResponse) -> String {
    let body: ErrorBody = actix_test::read_body_json(response).await;
    body.detail
}

#[actix_web::test]
async fn register_returns_created_receipt() {
    let mut ports = MockPorts::default();
    let user_id = UserId::random();
    let expected_id = *user_id.as_uuid();
    ports
        .auth
        .expect_register()
        .withf(|request, _| request.email.as_str() == "ada@example.com")
        .times(1)
        .return_once(move |_, _| {
            Ok(RegistrationReceipt {
                user_id,
                email: Email::parse("ada@example.com").expect("email"),
                referral_code: ReferralCode::parse("QU1A2B3C4D").expect("code"),
            })
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(register_body("Analytical1"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user_id"], json!(expected_id));
    assert_eq!(body["referral_code"], "QU1A2B3C4D");
}

#[rstest]
#[case("short1A", "Password must be at least 8 characters")]
#[case("alllowercase1", "Password must contain at least one uppercase letter")]
#[case("ALLUPPERCASE1", "Password must contain at least one lowercase letter")]
#[case("NoDigitsHere", "Password must contain at least one digit")]
#[actix_web::test]
async fn register_rejects_weak_passwords(#[case] password: &str, #[case] detail: &str) {
    let app = actix_test::init_service(MockPorts::default().into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(register_body(password))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail_of(response).await, detail);
}

#[actix_web::test]
async fn register_with_missing_field_is_unprocessable() {
    let app = actix_test::init_service(MockPorts::default().into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({ "email": "ada@example.com", "password": "Analytical1" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn register_conflict_surfaces_detail() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_register()
        .return_once(|_, _| Err(Error::conflict("Email already registered")));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(register_body("Analytical1"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(detail_of(response).await, "Email already registered");
}

#[actix_web::test]
async fn login_returns_token_pair() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_login()
        .withf(|credentials, _| credentials.email().as_str() == "ada@example.com")
        .return_once(|_, _| Ok(session()));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "email": "Ada@Example.com", "password": "Analytical1" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 1800);
    assert_eq!(body["access_token"], "access");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn login_failure_is_unauthorized_with_challenge() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_login()
        .return_once(|_, _| Err(Error::unauthorized("Invalid email or password")));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "email": "ada@example.com", "password": "Wrong1234" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get("www-authenticate")
            .and_then(|value| value.to_str().ok()),
        Some("Bearer")
    );
    assert_eq!(detail_of(response).await, "Invalid email or password");
}

#[rstest]
#[case::body(Some(json!({ "refresh_token": "r1" })), "")]
#[case::query(None, "?refresh_token=r1")]
#[actix_web::test]
async fn refresh_accepts_body_or_query(#[case] body: Option<Value>, #[case] query: &str) {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_refresh()
        .with(eq("r1"))
        .times(1)
        .return_once(|_| {
            Ok(RefreshedAccess {
                access_token: "fresh".into(),
                expires_in: 1800,
            })
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let mut request =
        actix_test::TestRequest::post().uri(&format!("/api/v1/auth/refresh{query}"));
    if let Some(json) = body {
        request = request.set_json(json);
    }
    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value,
        json!({ "access_token": "fresh", "token_type": "bearer", "expires_in": 1800 })
    );
}

#[actix_web::test]
async fn refresh_without_token_is_unprocessable() {
    let app = actix_test::init_service(MockPorts::default().into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail_of(response).await, "refresh_token is required");
}

#[actix_web::test]
async fn logout_forwards_both_tokens_and_always_succeeds() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_logout()
        .withf(|request, _| {
            request.refresh_token.as_deref() == Some("r1")
                && request.access_token.as_deref() == Some("test-access-token")
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer_header())
        .set_json(json!({ "refresh_token": "r1" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: SuccessResponse = actix_test::read_body_json(response).await;
    assert_eq!(body, SuccessResponse::new("Logged out successfully"));
}

#[rstest]
#[case(true, Some("/api/v1/auth/google/login"))]
#[case(false, None)]
#[actix_web::test]
async fn oauth_status_reports_google(#[case] enabled: bool, #[case] login_url: Option<&str>) {
    let mut ports = MockPorts::default();
    ports.google.expect_status().return_const(OAuthProviderStatus {
        google_enabled: enabled,
    });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/auth/oauth/status")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["google"]["enabled"], enabled);
    assert_eq!(body["google"]["login_url"], json!(login_url));
    assert_eq!(body["facebook"], json!({ "enabled": false, "login_url": null }));
    assert_eq!(body["apple"]["enabled"], false);
}

#[actix_web::test]
async fn google_login_passes_redirect_through() {
    let mut ports = MockPorts::default();
    ports
        .google
        .expect_authorization_url()
        .with(eq(Some("https://app.example.com/cb".to_owned())))
        .return_once(|_| Ok("https://accounts.google.com/o/oauth2/v2/auth?x=1".into()));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/auth/google/login?redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(
        body["auth_url"],
        "https://accounts.google.com/o/oauth2/v2/auth?x=1"
    );
}

#[actix_web::test]
async fn google_login_unconfigured_is_service_unavailable() {
    let mut ports = MockPorts::default();
    ports
        .google
        .expect_authorization_url()
        .return_once(|_| Err(Error::service_unavailable("Google OAuth is not configured")));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/auth/google/login")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

fn google_ports() -> MockPorts {
    let mut ports = MockPorts::default();
    ports
        .google
        .expect_complete_callback()
        .with(eq("auth-code"), mockall::predicate::always())
        .return_once(|_, _| {
            Ok(OAuthSession {
                session: session(),
                is_new_user: true,
            })
        });
    ports
}

#[actix_web::test]
async fn google_callback_without_state_returns_tokens() {
    let app = actix_test::init_service(google_ports().into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/auth/google/callback?code=auth-code")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["is_new_user"], true);
    assert_eq!(body["access_token"], "access");
    assert_eq!(body["token_type"], "bearer");
}

#[actix_web::test]
async fn google_callback_with_url_state_redirects() {
    let app = actix_test::init_service(google_ports().into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/auth/google/callback?code=auth-code&state=https%3A%2F%2Fapp.example.com%2Fdone")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header");
    assert_eq!(
        location,
        "https://app.example.com/done?access_token=access&refresh_token=refresh"
    );
}

#[actix_web::test]
async fn google_callback_ignores_non_url_state() {
    let app = actix_test::init_service(google_ports().into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/auth/google/callback?code=auth-code&state=opaque")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case(None)]
#[case(Some("opaque"))]
fn redirect_target_ignores_opaque_state(#[case] state: Option<&str>) {
    let target = redirect_target(state.map(str::to_owned)).expect("no target");
    assert!(target.is_none());
}

#[rstest]
fn redirect_target_rejects_unparseable_urls() {
    let err = redirect_target(Some("http//broken".to_owned())).expect_err("invalid url");
    assert_eq!(err.message(), "Invalid redirect URL");
}

#[actix_web::test]
async fn google_callback_checks_state_before_signing_in() {
    let mut ports = MockPorts::default();
    ports.google.expect_complete_callback().never();
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/auth/google/callback?code=auth-code&state=http%2F%2Fbroken")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail_of(response).await, "Invalid redirect URL");
}

#[actix_web::test]
async fn google_token_signs_in_existing_account() {
    let mut ports = MockPorts::default();
    ports
        .google
        .expect_authenticate_id_token()
        .with(eq("id-token"), mockall::predicate::always())
        .return_once(|_, _| {
            Ok(OAuthSession {
                session: session(),
                is_new_user: false,
            })
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/google/token")
        .set_json(json!({ "id_token": "id-token" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["is_new_user"], false);
    assert_eq!(body["refresh_token"], "refresh");
}
