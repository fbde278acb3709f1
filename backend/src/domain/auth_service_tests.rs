//! Tests for the authentication service.

use std::sync::Arc;

use chrono::Duration;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    FixturePasswordHasher, MockTokenCodec, MockTokenRevocationStore, MockUserRepository,
    TokenCodecError, UserPersistenceError,
};
use crate::domain::user::fixtures::{fixed_now, sample_user, sample_user_with_hash};
use crate::domain::IssuedToken;

type TestService = AuthService<MockUserRepository, MockTokenRevocationStore>;

fn claims_for(user: &UserId, kind: TokenKind) -> TokenClaims {
    TokenClaims::for_user(user, kind, fixed_now(), fixed_now() + Duration::minutes(30))
}

fn issuing_codec() -> MockTokenCodec {
    let mut codec = MockTokenCodec::new();
    codec.expect_issue().returning(|user, kind| {
        Ok(IssuedToken {
            token: format!("{kind:?}-{user}"),
            claims: claims_for(user, kind),
        })
    });
    codec
        .expect_lifetime()
        .returning(|kind| match kind {
            TokenKind::Access => Duration::minutes(30),
            TokenKind::Refresh => Duration::days(7),
        });
    codec
}

fn make_service(
    users: MockUserRepository,
    revocations: MockTokenRevocationStore,
    codec: MockTokenCodec,
) -> TestService {
    AuthService::new(
        Arc::new(users),
        Arc::new(revocations),
        Arc::new(FixturePasswordHasher),
        Arc::new(codec),
        Arc::new(DefaultClock),
    )
}

#[fixture]
fn registration() -> RegistrationRequest {
    RegistrationRequest::try_from_parts(
        "ada@example.com",
        "Analytical1",
        "Ada",
        "Lovelace",
        Some("+2348000000000"),
    )
    .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn register_creates_pending_account(registration: RegistrationRequest) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users.expect_referral_code_exists().return_once(|_| Ok(false));
    users
        .expect_insert()
        .withf(|user| {
            user.status == AccountStatus::Pending
                && user.password_hash == "hashed:Analytical1"
                && user.activity_log.len() == 1
                && user.activity_log[0].action == ActivityKind::Register
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(users, MockTokenRevocationStore::new(), MockTokenCodec::new());
    let receipt = service
        .register(registration, ClientContext::default())
        .await
        .expect("registration succeeds");

    assert_eq!(receipt.email.as_str(), "ada@example.com");
    assert!(receipt.referral_code.as_str().starts_with("QU"));
}

#[rstest]
#[tokio::test]
async fn register_rejects_existing_email(registration: RegistrationRequest) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(sample_user())));
    users.expect_insert().never();

    let service = make_service(users, MockTokenRevocationStore::new(), MockTokenCodec::new());
    let error = service
        .register(registration, ClientContext::default())
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Email already registered");
}

#[rstest]
#[tokio::test]
async fn register_maps_insert_race_to_conflict(registration: RegistrationRequest) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users.expect_referral_code_exists().return_once(|_| Ok(false));
    users
        .expect_insert()
        .return_once(|_| Err(UserPersistenceError::duplicate("email")));

    let service = make_service(users, MockTokenRevocationStore::new(), MockTokenCodec::new());
    let error = service
        .register(registration, ClientContext::default())
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("ada@example.com", password).expect("credentials shape")
}

#[rstest]
#[tokio::test]
async fn login_issues_tokens_and_records_activity() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(sample_user())));
    users
        .expect_update()
        .withf(|user| {
            user.engagement.login_count == 1
                && user.last_login_at.is_some()
                && user
                    .activity_log
                    .last()
                    .is_some_and(|entry| entry.ip_address.as_deref() == Some("10.0.0.1"))
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(users, MockTokenRevocationStore::new(), issuing_codec());
    let client = ClientContext {
        ip_address: Some("10.0.0.1".to_owned()),
        user_agent: Some("tests".to_owned()),
    };
    let session = service
        .login(credentials("Analytical1"), client)
        .await
        .expect("login succeeds");

    assert_eq!(session.expires_in, 1800);
    assert!(session.access_token.starts_with("Access-"));
    assert!(session.refresh_token.starts_with("Refresh-"));
}

#[rstest]
#[case(None, "Analytical1", "Invalid email or password")]
#[case(Some(AccountStatus::Active), "wrong-password", "Invalid email or password")]
#[case(Some(AccountStatus::Suspended), "Analytical1", "Your account has been suspended")]
#[case(Some(AccountStatus::Disabled), "Analytical1", "Your account has been disabled")]
#[tokio::test]
async fn login_rejections_are_unauthorized(
    #[case] status: Option<AccountStatus>,
    #[case] password: &str,
    #[case] expected: &str,
) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(move |_| {
        Ok(status.map(|status| {
            let mut user = sample_user();
            user.status = status;
            user
        }))
    });
    users.expect_update().never();

    let service = make_service(users, MockTokenRevocationStore::new(), MockTokenCodec::new());
    let error = service
        .login(credentials(password), ClientContext::default())
        .await
        .expect_err("login rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), expected);
}

#[rstest]
#[tokio::test]
async fn login_hides_deleted_accounts() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| {
        let mut user = sample_user();
        user.soft_delete(fixed_now());
        Ok(Some(user))
    });

    let service = make_service(users, MockTokenRevocationStore::new(), MockTokenCodec::new());
    let error = service
        .login(credentials("Analytical1"), ClientContext::default())
        .await
        .expect_err("deleted account");

    assert_eq!(error.message(), "Invalid email or password");
}

#[rstest]
#[tokio::test]
async fn login_treats_unusable_hash_as_wrong_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(sample_user_with_hash("$argon2id$broken"))));

    let service = make_service(users, MockTokenRevocationStore::new(), MockTokenCodec::new());
    let error = service
        .login(credentials("Analytical1"), ClientContext::default())
        .await
        .expect_err("unusable hash");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

fn decoding_codec(claims: Result<TokenClaims, TokenCodecError>) -> MockTokenCodec {
    let mut codec = issuing_codec();
    codec.expect_decode().return_once(move |_| claims);
    codec
}

#[rstest]
#[tokio::test]
async fn refresh_issues_new_access_token() {
    let user = sample_user();
    let claims = claims_for(&user.id, TokenKind::Refresh);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    let mut revocations = MockTokenRevocationStore::new();
    revocations.expect_is_revoked().return_once(|_| Ok(false));

    let service = make_service(users, revocations, decoding_codec(Ok(claims)));
    let refreshed = service.refresh("refresh").await.expect("refresh succeeds");

    assert!(refreshed.access_token.starts_with("Access-"));
    assert_eq!(refreshed.expires_in, 1800);
}

#[rstest]
#[case(Err(TokenCodecError::Expired))]
#[case(Err(TokenCodecError::invalid("bad signature")))]
#[case(Ok(claims_for(&UserId::random(), TokenKind::Access)))]
#[tokio::test]
async fn refresh_rejects_unusable_tokens(#[case] decoded: Result<TokenClaims, TokenCodecError>) {
    let mut revocations = MockTokenRevocationStore::new();
    revocations.expect_is_revoked().never();

    let service = make_service(MockUserRepository::new(), revocations, decoding_codec(decoded));
    let error = service.refresh("token").await.expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Invalid refresh token");
}

#[rstest]
#[tokio::test]
async fn refresh_rejects_revoked_tokens() {
    let claims = claims_for(&UserId::random(), TokenKind::Refresh);
    let mut revocations = MockTokenRevocationStore::new();
    revocations.expect_is_revoked().return_once(|_| Ok(true));

    let service = make_service(
        MockUserRepository::new(),
        revocations,
        decoding_codec(Ok(claims)),
    );
    let error = service.refresh("token").await.expect_err("revoked");

    assert_eq!(error.message(), "Invalid refresh token");
}

#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test]
async fn refresh_rejects_missing_or_inactive_accounts(#[case] exists: bool) {
    let mut user = sample_user();
    user.is_active = false;
    let claims = claims_for(&user.id, TokenKind::Refresh);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(exists.then_some(user)));
    let mut revocations = MockTokenRevocationStore::new();
    revocations.expect_is_revoked().return_once(|_| Ok(false));

    let service = make_service(users, revocations, decoding_codec(Ok(claims)));
    let error = service.refresh("token").await.expect_err("inactive");

    assert_eq!(error.message(), "Account not found or inactive");
}

#[rstest]
#[tokio::test]
async fn logout_revokes_refresh_token_until_expiry() {
    let claims = claims_for(&UserId::random(), TokenKind::Refresh);
    let jti = claims.jti;
    let expires_at = claims.expires_at();
    let mut revocations = MockTokenRevocationStore::new();
    revocations
        .expect_revoke()
        .withf(move |revoked, until| *revoked == jti && *until == expires_at)
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = make_service(
        MockUserRepository::new(),
        revocations,
        decoding_codec(Ok(claims)),
    );
    service
        .logout(
            LogoutRequest {
                refresh_token: Some("refresh".to_owned()),
                access_token: None,
            },
            ClientContext::default(),
        )
        .await
        .expect("logout succeeds");
}

#[rstest]
#[tokio::test]
async fn logout_records_activity_for_access_token() {
    let user = sample_user();
    let claims = claims_for(&user.id, TokenKind::Access);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    users
        .expect_update()
        .withf(|user| {
            user.activity_log
                .last()
                .is_some_and(|entry| entry.action == ActivityKind::Logout)
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(
        users,
        MockTokenRevocationStore::new(),
        decoding_codec(Ok(claims)),
    );
    service
        .logout(
            LogoutRequest {
                refresh_token: None,
                access_token: Some("access".to_owned()),
            },
            ClientContext::default(),
        )
        .await
        .expect("logout succeeds");
}

#[rstest]
#[tokio::test]
async fn logout_succeeds_with_garbage_tokens() {
    let mut revocations = MockTokenRevocationStore::new();
    revocations.expect_revoke().never();
    let mut codec = MockTokenCodec::new();
    codec
        .expect_decode()
        .returning(|_| Err(TokenCodecError::invalid("garbage")));

    let service = make_service(MockUserRepository::new(), revocations, codec);
    service
        .logout(
            LogoutRequest {
                refresh_token: Some("garbage".to_owned()),
                access_token: Some("garbage".to_owned()),
            },
            ClientContext::default(),
        )
        .await
        .expect("logout always succeeds");
}
