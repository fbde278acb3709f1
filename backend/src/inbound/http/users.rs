//! Current-user API handlers.
//!
//! ```text
//! GET    /api/v1/users/me
//! PUT    /api/v1/users/me {"first_name":"Ada","address":{"city":"Ikeja","state":"Lagos"}}
//! DELETE /api/v1/users/me?reason=...
//! PUT    /api/v1/users/me/profile-photo {"profile_photo":"https://..."}
//! GET    /api/v1/users/me/activity?skip=0&limit=20
//! POST   /api/v1/users/me/addresses {"city":"Ikeja","state":"Lagos","is_primary":true}
//! POST   /api/v1/users/me/favorites/vendors {"vendor_id":"..."}
//! ```
//!
//! Every handler resolves the caller through [`CurrentUser`] and hands the
//! loaded account to the [`ProfileCommand`](crate::domain::ports::ProfileCommand)
//! port.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    ActivityEntry, ActivityPage, Address, AddressDraft, Error, NotificationPreferences,
    PlainPassword, ProfileUpdate, TravelPreferences, TravelPreferencesUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::CurrentUser;
use crate::inbound::http::client::Client;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    AddressSchema, NotificationPreferencesSchema, SuccessResponse, TravelPreferencesSchema,
    UserResponse,
};
use crate::inbound::http::state::HttpState;

const DEFAULT_ACTIVITY_LIMIT: u32 = 20;

/// Address fields accepted by profile updates and the address book.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AddressRequest {
    pub label: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Defaults to `true`; a new primary address demotes the others.
    pub is_primary: Option<bool>,
}

impl From<AddressRequest> for AddressDraft {
    fn from(value: AddressRequest) -> Self {
        Self {
            label: value.label,
            street: value.street,
            city: value.city,
            state: value.state,
            country: value.country,
            postal_code: value.postal_code,
            latitude: value.latitude,
            longitude: value.longitude,
            is_primary: value.is_primary,
        }
    }
}

/// Partial profile update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<AddressRequest>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            display_name: value.display_name,
            phone: value.phone,
            bio: value.bio,
            date_of_birth: value.date_of_birth,
            gender: value.gender,
            address: value.address.map(AddressDraft::from),
        }
    }
}

/// Partial travel preferences update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub interests: Option<Vec<String>>,
    pub travel_style: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub currency: Option<String>,
}

impl From<UpdatePreferencesRequest> for TravelPreferencesUpdate {
    fn from(value: UpdatePreferencesRequest) -> Self {
        Self {
            interests: value.interests,
            travel_style: value.travel_style,
            dietary_restrictions: value.dietary_restrictions,
            languages: value.languages,
            currency: value.currency,
        }
    }
}

/// Saved travel preferences together with the notification flags.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PreferencesResponse {
    #[schema(value_type = TravelPreferencesSchema)]
    pub preferences: TravelPreferences,
    #[schema(value_type = NotificationPreferencesSchema)]
    pub notification_preferences: NotificationPreferences,
}

/// Travel preferences after an update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PreferencesUpdatedResponse {
    pub success: bool,
    #[schema(value_type = TravelPreferencesSchema)]
    pub preferences: TravelPreferences,
}

/// Notification flags after an update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NotificationPreferencesUpdatedResponse {
    pub success: bool,
    #[schema(value_type = NotificationPreferencesSchema)]
    pub notification_preferences: NotificationPreferences,
}

/// Acknowledgement of a saved address.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddressAddedResponse {
    pub success: bool,
    #[schema(example = "Address added successfully")]
    pub message: String,
    pub addresses_count: usize,
}

/// Body for `PUT /api/v1/users/me/profile-photo`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProfilePhotoRequest {
    pub profile_photo: String,
}

/// Stored profile photo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProfilePhotoResponse {
    pub success: bool,
    pub profile_photo: Option<String>,
}

/// Body for `PUT /api/v1/users/me/cover-photo`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CoverPhotoRequest {
    pub cover_photo: String,
}

/// Stored cover photo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CoverPhotoResponse {
    pub success: bool,
    pub cover_photo: Option<String>,
}

/// Body for `POST /api/v1/users/me/change-password`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Query for `DELETE /api/v1/users/me`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeleteAccountQuery {
    /// Free-text reason kept in the activity log.
    pub reason: Option<String>,
}

/// Query for `GET /api/v1/users/me/activity`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Entries to skip, counting from the most recent.
    #[serde(default)]
    pub skip: usize,
    /// Page size, 1 to 100.
    #[serde(default = "default_activity_limit")]
    pub limit: u32,
}

const fn default_activity_limit() -> u32 {
    DEFAULT_ACTIVITY_LIMIT
}

/// One page of the activity log.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ActivityPageResponse {
    #[schema(value_type = Vec<Object>)]
    pub activities: Vec<ActivityEntry>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub limit: u32,
}

impl From<ActivityPage> for ActivityPageResponse {
    fn from(value: ActivityPage) -> Self {
        Self {
            activities: value.activities,
            total: value.total,
            page: value.page,
            pages: value.pages,
            limit: value.limit,
        }
    }
}

/// Referral programme summary.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReferralsResponse {
    pub referral_code: String,
    pub referral_count: u32,
    pub referral_credits: u32,
}

/// Saved destinations and vendors.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FavoritesResponse {
    pub favorite_destinations: Vec<String>,
    pub favorite_vendors: Vec<Uuid>,
}

impl From<&crate::domain::User> for FavoritesResponse {
    fn from(user: &crate::domain::User) -> Self {
        Self {
            favorite_destinations: user.favorite_destinations.clone(),
            favorite_vendors: user.favorite_vendors.clone(),
        }
    }
}

/// Body for `POST /api/v1/users/me/favorites/destinations`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FavoriteDestinationRequest {
    pub destination: String,
}

/// Body for `POST /api/v1/users/me/favorites/vendors`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FavoriteVendorRequest {
    pub vendor_id: Uuid,
}

/// Fetch the authenticated account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Account has been deleted", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(user: CurrentUser) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(user.into_inner()))
}

/// Update profile fields of the authenticated account.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[put("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    client: Client,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let updated = state
        .profile
        .update_profile(
            user.into_inner(),
            payload.into_inner().into(),
            client.into_inner(),
        )
        .await?;
    Ok(web::Json(UserResponse::from(updated)))
}

/// Soft-delete the authenticated account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    params(DeleteAccountQuery),
    responses(
        (status = 200, description = "Account deleted", body = SuccessResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteCurrentUser"
)]
#[delete("/users/me")]
pub async fn delete_current_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    client: Client,
    query: web::Query<DeleteAccountQuery>,
) -> ApiResult<web::Json<SuccessResponse>> {
    state
        .profile
        .delete_account(user.into_inner(), query.into_inner().reason, client.into_inner())
        .await?;
    Ok(web::Json(SuccessResponse::new("Account deleted successfully")))
}

/// Replace the profile photo URL.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/profile-photo",
    request_body = ProfilePhotoRequest,
    responses(
        (status = 200, description = "Photo stored", body = ProfilePhotoResponse),
        (status = 422, description = "Empty URL", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateProfilePhoto"
)]
#[put("/users/me/profile-photo")]
pub async fn update_profile_photo(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<ProfilePhotoRequest>,
) -> ApiResult<web::Json<ProfilePhotoResponse>> {
    let updated = state
        .profile
        .set_profile_photo(user.into_inner(), payload.into_inner().profile_photo)
        .await?;
    Ok(web::Json(ProfilePhotoResponse {
        success: true,
        profile_photo: updated.profile_photo,
    }))
}

/// Replace the cover photo URL.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/cover-photo",
    request_body = CoverPhotoRequest,
    responses(
        (status = 200, description = "Photo stored", body = CoverPhotoResponse),
        (status = 422, description = "Empty URL", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateCoverPhoto"
)]
#[put("/users/me/cover-photo")]
pub async fn update_cover_photo(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CoverPhotoRequest>,
) -> ApiResult<web::Json<CoverPhotoResponse>> {
    let updated = state
        .profile
        .set_cover_photo(user.into_inner(), payload.into_inner().cover_photo)
        .await?;
    Ok(web::Json(CoverPhotoResponse {
        success: true,
        cover_photo: updated.cover_photo,
    }))
}

/// Travel preferences, or the defaults when none were saved, together with
/// the notification flags.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/preferences",
    responses((status = 200, description = "Preferences", body = PreferencesResponse)),
    tags = ["users"],
    operation_id = "getPreferences"
)]
#[get("/users/me/preferences")]
pub async fn get_preferences(user: CurrentUser) -> web::Json<PreferencesResponse> {
    let user = user.into_inner();
    web::Json(PreferencesResponse {
        preferences: user.preferences.unwrap_or_default(),
        notification_preferences: user.notification_preferences,
    })
}

/// Update travel preferences.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/preferences",
    request_body = UpdatePreferencesRequest,
    responses(
        (status = 200, description = "Updated preferences", body = PreferencesUpdatedResponse)
    ),
    tags = ["users"],
    operation_id = "updatePreferences"
)]
#[put("/users/me/preferences")]
pub async fn update_preferences(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<UpdatePreferencesRequest>,
) -> ApiResult<web::Json<PreferencesUpdatedResponse>> {
    let updated = state
        .profile
        .update_preferences(user.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(PreferencesUpdatedResponse {
        success: true,
        preferences: updated.preferences.unwrap_or_default(),
    }))
}

/// Merge notification flags.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/notification-preferences",
    request_body(content = NotificationPreferencesSchema, description = "Any subset of the flags"),
    responses(
        (status = 200, description = "All notification flags", body = NotificationPreferencesUpdatedResponse),
        (status = 422, description = "Unknown flag", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateNotificationPreferences"
)]
#[put("/users/me/notification-preferences")]
pub async fn update_notification_preferences(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<BTreeMap<String, bool>>,
) -> ApiResult<web::Json<NotificationPreferencesUpdatedResponse>> {
    let updated = state
        .profile
        .update_notification_preferences(user.into_inner(), payload.into_inner())
        .await?;
    Ok(web::Json(NotificationPreferencesUpdatedResponse {
        success: true,
        notification_preferences: updated.notification_preferences,
    }))
}

/// Saved addresses in the order they were added.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/addresses",
    responses((status = 200, description = "Address book", body = [AddressSchema])),
    tags = ["users"],
    operation_id = "listAddresses"
)]
#[get("/users/me/addresses")]
pub async fn list_addresses(user: CurrentUser) -> web::Json<Vec<Address>> {
    web::Json(user.into_inner().addresses)
}

/// Save an address to the address book.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/addresses",
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address saved", body = AddressAddedResponse),
        (status = 422, description = "City or state missing", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "addAddress"
)]
#[post("/users/me/addresses")]
pub async fn add_address(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<AddressRequest>,
) -> ApiResult<HttpResponse> {
    let updated = state
        .profile
        .add_address(user.into_inner(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(AddressAddedResponse {
        success: true,
        message: "Address added successfully".to_owned(),
        addresses_count: updated.addresses.len(),
    }))
}

/// Change the account password.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = SuccessResponse),
        (status = 401, description = "Current password is incorrect", body = ErrorBody),
        (status = 422, description = "New password too weak", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[post("/users/me/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    user: CurrentUser,
    client: Client,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let ChangePasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    state
        .profile
        .change_password(
            user.into_inner(),
            PlainPassword::new(current_password),
            PlainPassword::new(new_password),
            client.into_inner(),
        )
        .await?;
    Ok(web::Json(SuccessResponse::new("Password changed successfully")))
}

/// Page through the activity log, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/activity",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activity page", body = ActivityPageResponse),
        (status = 422, description = "Invalid paging", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listActivity"
)]
#[get("/users/me/activity")]
pub async fn list_activity(
    user: CurrentUser,
    query: web::Query<ActivityQuery>,
) -> ApiResult<web::Json<ActivityPageResponse>> {
    let ActivityQuery { skip, limit } = query.into_inner();
    let page = ActivityPage::for_user(&user.0, skip, limit)
        .map_err(|err| Error::unprocessable(err.to_string()))?;
    Ok(web::Json(ActivityPageResponse::from(page)))
}

/// Referral code and earnings.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/referrals",
    responses((status = 200, description = "Referral summary", body = ReferralsResponse)),
    tags = ["users"],
    operation_id = "getReferrals"
)]
#[get("/users/me/referrals")]
pub async fn get_referrals(user: CurrentUser) -> web::Json<ReferralsResponse> {
    let user = user.into_inner();
    web::Json(ReferralsResponse {
        referral_code: user.referral_code.as_str().to_owned(),
        referral_count: user.engagement.referral_count,
        referral_credits: user.engagement.referral_credits,
    })
}

/// Saved destinations and vendors.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/favorites",
    responses((status = 200, description = "Favourites", body = FavoritesResponse)),
    tags = ["users"],
    operation_id = "getFavorites"
)]
#[get("/users/me/favorites")]
pub async fn get_favorites(user: CurrentUser) -> web::Json<FavoritesResponse> {
    web::Json(FavoritesResponse::from(&user.0))
}

/// Save a destination. Saving it again changes nothing.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/favorites/destinations",
    request_body = FavoriteDestinationRequest,
    responses(
        (status = 200, description = "Favourites", body = FavoritesResponse),
        (status = 422, description = "Empty destination", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "addFavoriteDestination"
)]
#[post("/users/me/favorites/destinations")]
pub async fn add_favorite_destination(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<FavoriteDestinationRequest>,
) -> ApiResult<web::Json<FavoritesResponse>> {
    let updated = state
        .profile
        .add_favorite_destination(user.into_inner(), payload.into_inner().destination)
        .await?;
    Ok(web::Json(FavoritesResponse::from(&updated)))
}

/// Forget a saved destination.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/favorites/destinations/{destination}",
    params(("destination" = String, Path, description = "Destination to remove")),
    responses((status = 200, description = "Favourites", body = FavoritesResponse)),
    tags = ["users"],
    operation_id = "removeFavoriteDestination"
)]
#[delete("/users/me/favorites/destinations/{destination}")]
pub async fn remove_favorite_destination(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<FavoritesResponse>> {
    let updated = state
        .profile
        .remove_favorite_destination(user.into_inner(), path.into_inner())
        .await?;
    Ok(web::Json(FavoritesResponse::from(&updated)))
}

/// Save a vendor. Saving it again changes nothing.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/favorites/vendors",
    request_body = FavoriteVendorRequest,
    responses(
        (status = 200, description = "Vendor saved", body = SuccessResponse),
        (status = 422, description = "Malformed vendor id", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "addFavoriteVendor"
)]
#[post("/users/me/favorites/vendors")]
pub async fn add_favorite_vendor(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<FavoriteVendorRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    state
        .profile
        .add_favorite_vendor(user.into_inner(), payload.into_inner().vendor_id)
        .await?;
    Ok(web::Json(SuccessResponse::new("Vendor added to favorites")))
}

/// Forget a saved vendor.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/favorites/vendors/{vendor_id}",
    params(("vendor_id" = Uuid, Path, description = "Vendor to remove")),
    responses(
        (status = 200, description = "Vendor removed", body = SuccessResponse),
        (status = 422, description = "Malformed vendor id", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "removeFavoriteVendor"
)]
#[delete("/users/me/favorites/vendors/{vendor_id}")]
pub async fn remove_favorite_vendor(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<SuccessResponse>> {
    state
        .profile
        .remove_favorite_vendor(user.into_inner(), path.into_inner())
        .await?;
    Ok(web::Json(SuccessResponse::new("Vendor removed from favorites")))
}

#[cfg(test)]
mod tests;
