//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed account model used by the API and
//! persistence layers, and the services implementing the driving ports.
//! Types document their invariants and serialisation contracts in Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error payload.
//! - User (alias to `user::User`): account aggregate with nested documents.
//! - AuthService, GoogleSignInService, ProfileService, AccessTokenService:
//!   use-case implementations behind the ports in [`ports`].

mod access_token_service;
pub mod auth;
mod auth_service;
pub mod dashboard;
pub mod error;
mod google_sign_in_service;
pub mod password;
pub mod ports;
mod profile_service;
pub mod referral;
mod service_support;
pub mod trace_id;
pub mod user;
pub mod user_profile;

pub use self::access_token_service::AccessTokenService;
pub use self::auth::{
    AuthSession, DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_REFRESH_TOKEN_DAYS, IssuedToken,
    LoginCredentials, LoginValidationError, OAuthSession, RefreshedAccess, RegistrationReceipt,
    RegistrationRequest, RegistrationValidationError, TOKEN_TYPE_BEARER, TokenClaims, TokenKind,
    USER_TOKEN_AUDIENCE,
};
pub use self::auth_service::AuthService;
pub use self::dashboard::{
    ACTIVITY_PAGE_MAX, ActivityPage, ActivityPageError, DashboardOverview, DashboardStats,
    RecommendationBasis, UserDashboard,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::google_sign_in_service::{
    GOOGLE_AUTHORIZE_URL, GoogleOAuthConfig, GoogleSignInService,
};
pub use self::password::{PasswordPolicy, PasswordPolicyError, PlainPassword};
pub use self::profile_service::ProfileService;
pub use self::referral::{ReferralCode, ReferralCodeError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ACTIVITY_LOG_CAPACITY, AccountStatus, Email, FederatedAccount, NewAccount, PersonName, User,
    UserId, UserValidationError,
};
pub use self::user_profile::{
    ActivityEntry, ActivityKind, Address, AddressDraft, AddressValidationError, ClientContext,
    Engagement, NotificationPreferences, ProfileUpdate, Subscription, SubscriptionPlan,
    TravelPreferences, TravelPreferencesUpdate, UnknownNotificationFlag, UserStats,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("User access required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
