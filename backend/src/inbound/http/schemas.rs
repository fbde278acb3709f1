//! Response payloads shared by the account, profile and dashboard handlers.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. Where a
//! handler returns a domain document directly, a schema wrapper here mirrors
//! its structure using utoipa's external schema registration; other nested
//! documents are described as opaque objects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Address, NotificationPreferences, Subscription, TravelPreferences, User};

/// OpenAPI schema for [`crate::domain::TravelPreferences`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TravelPreferences)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TravelPreferencesSchema {
    #[schema(example = json!(["culture", "food"]))]
    interests: Vec<String>,
    #[schema(example = "adventure")]
    travel_style: Option<String>,
    dietary_restrictions: Vec<String>,
    #[schema(example = json!(["English"]))]
    languages: Vec<String>,
    #[schema(example = "NGN")]
    currency: String,
}

/// OpenAPI schema for [`crate::domain::Address`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Address)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AddressSchema {
    #[schema(example = "Home")]
    label: String,
    street: Option<String>,
    #[schema(example = "Ikeja")]
    city: String,
    #[schema(example = "Lagos")]
    state: String,
    #[schema(example = "Nigeria")]
    country: String,
    postal_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    is_primary: bool,
}

/// OpenAPI schema for [`crate::domain::NotificationPreferences`].
///
/// Every flag is a boolean; updates may send any subset of them.
#[derive(ToSchema)]
#[schema(as = crate::domain::NotificationPreferences)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NotificationPreferencesSchema {
    email_bookings: bool,
    email_promotions: bool,
    email_newsletter: bool,
    email_experience_updates: bool,
    email_agent_messages: bool,
    push_bookings: bool,
    push_messages: bool,
    push_promotions: bool,
    push_experience_updates: bool,
    sms_bookings: bool,
    sms_verification: bool,
}

/// Public projection of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub full_name: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    pub cover_photo: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub is_active: bool,
    #[schema(value_type = Option<Object>)]
    pub address: Option<Address>,
    #[schema(value_type = Option<TravelPreferencesSchema>)]
    pub preferences: Option<TravelPreferences>,
    #[schema(value_type = NotificationPreferencesSchema)]
    pub notification_preferences: NotificationPreferences,
    #[schema(value_type = Object)]
    pub subscription: Subscription,
    pub followers_count: u32,
    pub following_count: u32,
    pub experiences_count: u32,
    pub reviews_count: u32,
    pub assigned_agent_id: Option<Uuid>,
    pub favorite_destinations: Vec<String>,
    #[schema(example = "QU1A2B3C4D")]
    pub referral_code: String,
    /// Percentage of optional profile fields filled in.
    pub profile_completion: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_str().to_owned(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            display_name: user.display_name.clone(),
            full_name: user.full_name(),
            phone: user.phone.clone(),
            bio: user.bio.clone(),
            profile_photo: user.profile_photo.clone(),
            cover_photo: user.cover_photo.clone(),
            date_of_birth: user.date_of_birth,
            gender: user.gender.clone(),
            status: user.status.as_str().to_owned(),
            is_email_verified: user.is_email_verified,
            is_phone_verified: user.is_phone_verified,
            is_active: user.is_active,
            address: user.address.clone(),
            preferences: user.preferences.clone(),
            notification_preferences: user.notification_preferences,
            subscription: user.subscription.clone(),
            followers_count: user.engagement.followers_count,
            following_count: user.engagement.following_count,
            experiences_count: user.engagement.experiences_count,
            reviews_count: user.engagement.reviews_count,
            assigned_agent_id: user.assigned_agent_id,
            favorite_destinations: user.favorite_destinations.clone(),
            referral_code: user.referral_code.as_str().to_owned(),
            profile_completion: user.profile_completion(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Acknowledgement returned by commands without a richer payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

impl SuccessResponse {
    /// Successful acknowledgement carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::fixtures::sample_user;
    use rstest::rstest;

    #[rstest]
    fn user_response_flattens_engagement_and_derived_fields() {
        let mut user = sample_user();
        user.engagement.followers_count = 4;
        user.display_name = Some("Ada L.".into());

        let json = serde_json::to_value(UserResponse::from(&user)).expect("serialise");
        assert_eq!(json["followers_count"], 4);
        assert_eq!(json["full_name"], user.full_name());
        assert_eq!(json["status"], user.status.as_str());
        assert_eq!(json["referral_code"], user.referral_code.as_str());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("activity_log").is_none());
        assert!(json["notification_preferences"].is_object());
    }

    #[rstest]
    fn success_response_shape() {
        let json = serde_json::to_value(SuccessResponse::new("Logged out successfully"))
            .expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "Logged out successfully" })
        );
    }
}
