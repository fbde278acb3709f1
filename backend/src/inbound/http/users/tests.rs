//! Tests for current-user API handlers.

use super::*;
use crate::domain::user::fixtures::{fixed_now, sample_user};
use crate::domain::{ActivityKind, ClientContext, User};
use crate::inbound::http::test_utils::{MockPorts, bearer_header};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn user_with_activity(entries: usize) -> User {
    let mut user = sample_user();
    for index in 0..entries {
        user.record_activity(ActivityEntry::new(
            ActivityKind::Login,
            format!("entry {index}"),
            &ClientContext::default(),
            fixed_now(),
        ));
    }
    user
}

async fn get_json(ports: MockPorts, uri: &str) -> (StatusCode, Value) {
    let app = actix_test::init_service(ports.into_app()).await;
    let request = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer_header())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[actix_web::test]
async fn current_user_requires_a_bearer_token() {
    let app = actix_test::init_service(MockPorts::default().into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.detail, "Not authenticated");
}

#[actix_web::test]
async fn current_user_rejects_unknown_tokens() {
    let app =
        actix_test::init_service(MockPorts::authenticated_as(sample_user()).into_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(("Authorization", "Bearer someone-else"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn current_user_returns_public_projection() {
    let user = sample_user();
    let (status, body) = get_json(
        MockPorts::authenticated_as(user.clone()),
        "/api/v1/users/me",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["full_name"], "Ada Lovelace");
    assert_eq!(body["referral_code"], user.referral_code.as_str());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn update_current_user_forwards_partial_update() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_update_profile()
        .withf(|_, update, _| {
            update.first_name.as_deref() == Some("Augusta")
                && update.last_name.is_none()
                && update
                    .address
                    .as_ref()
                    .and_then(|address| address.city.as_deref())
                    == Some("Ikeja")
        })
        .times(1)
        .return_once(|mut user, _, _| {
            user.first_name = "Augusta".into();
            Ok(user)
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/users/me")
        .insert_header(bearer_header())
        .set_json(json!({ "first_name": "Augusta", "address": { "city": "Ikeja" } }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["first_name"], "Augusta");
}

#[actix_web::test]
async fn delete_current_user_passes_reason() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_delete_account()
        .withf(|_, reason, _| reason.as_deref() == Some("moving on"))
        .times(1)
        .return_once(|mut user, _, _| {
            user.soft_delete(fixed_now());
            Ok(user)
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users/me?reason=moving%20on")
        .insert_header(bearer_header())
        .to_request();
    let body: SuccessResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body, SuccessResponse::new("Account deleted successfully"));
}

#[actix_web::test]
async fn profile_photo_update_echoes_stored_url() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_set_profile_photo()
        .return_once(|mut user, url| {
            user.profile_photo = Some(url);
            Ok(user)
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/users/me/profile-photo")
        .insert_header(bearer_header())
        .set_json(json!({ "profile_photo": "https://cdn.example.com/ada.png" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(
        body,
        json!({ "success": true, "profile_photo": "https://cdn.example.com/ada.png" })
    );
}

#[actix_web::test]
async fn preferences_default_when_unset() {
    let mut user = sample_user();
    user.preferences = None;
    let (status, body) = get_json(
        MockPorts::authenticated_as(user),
        "/api/v1/users/me/preferences",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"]["currency"], "NGN");
    assert_eq!(body["preferences"]["interests"], json!([]));
    assert_eq!(body["notification_preferences"]["email_bookings"], true);
}

#[actix_web::test]
async fn preference_update_is_acknowledged() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_update_preferences()
        .withf(|_, update| update.currency.as_deref() == Some("USD"))
        .times(1)
        .return_once(|mut user, update| {
            user.preferences
                .get_or_insert_with(TravelPreferences::default)
                .apply(update);
            Ok(user)
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/users/me/preferences")
        .insert_header(bearer_header())
        .set_json(json!({ "currency": "USD" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["preferences"]["currency"], "USD");
}

#[actix_web::test]
async fn notification_update_is_acknowledged() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_update_notification_preferences()
        .times(1)
        .return_once(|mut user, flags| {
            user.notification_preferences
                .apply(&flags)
                .expect("known flags");
            Ok(user)
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/users/me/notification-preferences")
        .insert_header(bearer_header())
        .set_json(json!({ "email_promotions": true }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["notification_preferences"]["email_promotions"], true);
}

#[actix_web::test]
async fn address_book_lists_saved_addresses() {
    let mut user = sample_user();
    user.add_address(
        crate::domain::Address::try_from_draft(AddressDraft {
            city: Some("Ikeja".to_owned()),
            state: Some("Lagos".to_owned()),
            ..AddressDraft::default()
        })
        .expect("valid address"),
    );
    let (status, body) = get_json(
        MockPorts::authenticated_as(user),
        "/api/v1/users/me/addresses",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["city"], "Ikeja");
    assert_eq!(body[0]["country"], "Nigeria");
    assert_eq!(body[0]["is_primary"], true);
}

#[actix_web::test]
async fn adding_an_address_reports_the_new_count() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_add_address()
        .withf(|_, draft| {
            draft.city.as_deref() == Some("Accra") && draft.is_primary == Some(false)
        })
        .times(1)
        .return_once(|mut user, draft| {
            user.add_address(crate::domain::Address::try_from_draft(draft).expect("valid"));
            Ok(user)
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/me/addresses")
        .insert_header(bearer_header())
        .set_json(json!({ "city": "Accra", "state": "Greater Accra", "is_primary": false }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({ "success": true, "message": "Address added successfully", "addresses_count": 1 })
    );
}

#[actix_web::test]
async fn favorite_vendor_is_saved_and_removed() {
    let vendor = Uuid::new_v4();
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_add_favorite_vendor()
        .withf(move |_, id| *id == vendor)
        .times(1)
        .return_once(|user, _| Ok(user));
    ports
        .profile
        .expect_remove_favorite_vendor()
        .withf(move |_, id| *id == vendor)
        .times(1)
        .return_once(|user, _| Ok(user));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/me/favorites/vendors")
        .insert_header(bearer_header())
        .set_json(json!({ "vendor_id": vendor }))
        .to_request();
    let added: SuccessResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(added.message, "Vendor added to favorites");

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/users/me/favorites/vendors/{vendor}"))
        .insert_header(bearer_header())
        .to_request();
    let removed: SuccessResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(removed.message, "Vendor removed from favorites");
}

#[actix_web::test]
async fn malformed_vendor_id_is_unprocessable() {
    let app =
        actix_test::init_service(MockPorts::authenticated_as(sample_user()).into_app()).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users/me/favorites/vendors/not-a-uuid")
        .insert_header(bearer_header())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn unknown_notification_flag_is_unprocessable() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_update_notification_preferences()
        .withf(|_, flags| flags.contains_key("carrier_pigeon"))
        .return_once(|_, _| {
            Err(Error::unprocessable(
                "Unknown notification preference: carrier_pigeon",
            ))
        });
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/users/me/notification-preferences")
        .insert_header(bearer_header())
        .set_json(json!({ "carrier_pigeon": true }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn change_password_reports_success() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_change_password()
        .withf(|_, current, new, _| {
            current.expose() == "Analytical1" && new.expose() == "Engine2024"
        })
        .times(1)
        .return_once(|user, _, _, _| Ok(user));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/me/change-password")
        .insert_header(bearer_header())
        .set_json(json!({ "current_password": "Analytical1", "new_password": "Engine2024" }))
        .to_request();
    let body: SuccessResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.message, "Password changed successfully");
}

#[actix_web::test]
async fn change_password_with_wrong_current_is_unauthorized() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_change_password()
        .return_once(|_, _, _, _| Err(Error::unauthorized("Current password is incorrect")));
    let app = actix_test::init_service(ports.into_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/me/change-password")
        .insert_header(bearer_header())
        .set_json(json!({ "current_password": "Nope12345", "new_password": "Engine2024" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.detail, "Current password is incorrect");
}

#[rstest]
#[case("", 20, 25, 1, 2)]
#[case("?skip=20&limit=20", 5, 25, 2, 2)]
#[case("?limit=100", 25, 25, 1, 1)]
#[actix_web::test]
async fn activity_is_paged(
    #[case] query: &str,
    #[case] returned: usize,
    #[case] total: usize,
    #[case] page: usize,
    #[case] pages: usize,
) {
    let (status, body) = get_json(
        MockPorts::authenticated_as(user_with_activity(25)),
        &format!("/api/v1/users/me/activity{query}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["activities"].as_array().map(Vec::len),
        Some(returned)
    );
    assert_eq!(body["total"], total);
    assert_eq!(body["page"], page);
    assert_eq!(body["pages"], pages);
}

#[rstest]
#[case("?limit=0")]
#[case("?limit=101")]
#[case("?skip=-1")]
#[actix_web::test]
async fn activity_rejects_bad_paging(#[case] query: &str) {
    let (status, _) = get_json(
        MockPorts::authenticated_as(sample_user()),
        &format!("/api/v1/users/me/activity{query}"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn referrals_expose_code_and_counters() {
    let mut user = sample_user();
    user.engagement.referral_count = 2;
    user.engagement.referral_credits = 500;
    let code = user.referral_code.as_str().to_owned();

    let (_, body) = get_json(
        MockPorts::authenticated_as(user),
        "/api/v1/users/me/referrals",
    )
    .await;

    assert_eq!(
        body,
        json!({ "referral_code": code, "referral_count": 2, "referral_credits": 500 })
    );
}

#[actix_web::test]
async fn favorite_destinations_round_trip_through_port() {
    let mut ports = MockPorts::authenticated_as(sample_user());
    ports
        .profile
        .expect_add_favorite_destination()
        .withf(|_, destination| destination == "Zanzibar")
        .return_once(|mut user, destination| {
            user.favorite_destinations.push(destination);
            Ok(user)
        });
    ports
        .profile
        .expect_remove_favorite_destination()
        .withf(|_, destination| destination == "Cape Town")
        .return_once(|user, _| Ok(user));
    let app = actix_test::init_service(ports.into_app()).await;

    let add = actix_test::TestRequest::post()
        .uri("/api/v1/users/me/favorites/destinations")
        .insert_header(bearer_header())
        .set_json(json!({ "destination": "Zanzibar" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, add).await;
    assert_eq!(body["favorite_destinations"], json!(["Zanzibar"]));

    let remove = actix_test::TestRequest::delete()
        .uri("/api/v1/users/me/favorites/destinations/Cape%20Town")
        .insert_header(bearer_header())
        .to_request();
    let response = actix_test::call_service(&app, remove).await;
    assert_eq!(response.status(), StatusCode::OK);
}
